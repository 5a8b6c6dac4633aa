//! End-to-end tests for the cfg-to-runner binary
//!
//! Each test works in its own temp directory passed as `--base-dir`, so
//! the config name and run_tests.sh resolve inside it.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_cfg-to-runner");

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .arg("--base-dir")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Should be able to run cfg-to-runner")
}

fn workspace_with(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("test.cfg"), config).unwrap();
    dir
}

fn second_line(dir: &Path) -> String {
    let script = fs::read_to_string(dir.join("run_tests.sh")).expect("script should exist");
    script.lines().nth(1).unwrap_or_default().to_string()
}

#[test]
fn test_flags_follow_whitelist_order() {
    let dir = workspace_with(
        "[UserJobTest]\n\
         test.mongo.exe = /usr/bin/mongod\n\
         test.user1 = alice\n",
    );

    let output = run_in(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        second_line(dir.path()),
        "ant test -Dtest.user1=\"alice\" -Dtest.mongo.exe=\"/usr/bin/mongod\""
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Using test config file"));
    assert!(stdout.contains("test.cfg"));
}

#[test]
fn test_empty_section_emits_bare_command() {
    let dir = workspace_with("[UserJobTest]\n");

    let output = run_in(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    let script = fs::read_to_string(dir.path().join("run_tests.sh")).unwrap();
    assert_eq!(script, "# Generated file - do not check into git\nant test\n");
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(dir.path(), &["nope.cfg"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = dir.path().join("nope.cfg");
    assert!(stdout.contains(&expected.display().to_string()));
    assert!(stdout.contains("No such config file"));
    assert!(!stdout.contains("Using test config file"));
    assert!(!dir.path().join("run_tests.sh").exists());
}

#[test]
fn test_missing_section() {
    let dir = workspace_with("[Other]\ntest.user1 = alice\n[Another]\n");

    let output = run_in(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("missing section UserJobTest"));
    assert!(!dir.path().join("run_tests.sh").exists());
}

#[test]
fn test_malformed_config_exits_one() {
    let dir = workspace_with("[UserJobTest]\ntest.user1 alice\n");

    let output = run_in(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("line 2"));
    assert!(!dir.path().join("run_tests.sh").exists());
}

#[test]
fn test_quoted_value_with_spaces() {
    let dir = workspace_with("[UserJobTest]\ntest.pwd1 = \"p a s s\"\n");

    let output = run_in(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(second_line(dir.path()), "ant test -Dtest.pwd1=\"p a s s\"");
}

#[test]
fn test_named_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ci.cfg"),
        "[UserJobTest]\ntest.temp.dir = /tmp/ujs\n",
    )
    .unwrap();

    let output = run_in(dir.path(), &["ci.cfg"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(second_line(dir.path()), "ant test -Dtest.temp.dir=\"/tmp/ujs\"");
}

#[test]
fn test_output_is_executable() {
    let dir = workspace_with("[UserJobTest]\ntest.user1 = alice\n");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(0));

    let mode = fs::metadata(dir.path().join("run_tests.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111, "owner, group and other need execute");
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = workspace_with(
        "[UserJobTest]\n\
         test.user1 = alice\n\
         test.token2 = \"tok en\"\n\
         unrelated = ignored\n",
    );

    assert_eq!(run_in(dir.path(), &[]).status.code(), Some(0));
    let first = fs::read(dir.path().join("run_tests.sh")).unwrap();
    assert_eq!(run_in(dir.path(), &[]).status.code(), Some(0));
    let second = fs::read(dir.path().join("run_tests.sh")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_dry_run_prints_script_only() {
    let dir = workspace_with("[UserJobTest]\ntest.user2 = bob\n");

    let output = run_in(dir.path(), &["--dry-run"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "# Generated file - do not check into git\nant test -Dtest.user2=\"bob\"\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("Using test config file"));
    assert!(!dir.path().join("run_tests.sh").exists());
}

#[test]
fn test_failure_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(dir.path(), &["nope.cfg"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);
    assert!(output.stderr.is_empty());
}

#[test]
fn test_config_with_bom() {
    let dir = workspace_with("\u{feff}[UserJobTest]\ntest.user1 = alice\n");

    let output = run_in(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(second_line(dir.path()), "ant test -Dtest.user1=\"alice\"");
}
