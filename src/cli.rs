use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::runner::RunRequest;
use crate::script::OUTPUT_FILE;

/// Config file read when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "test.cfg";

/// Generate run_tests.sh from the UserJobTest section of a test config
#[derive(Parser, Debug)]
#[command(name = "cfg-to-runner")]
#[command(about = "Generates an ant test runner script from a test credentials config")]
#[command(version)]
pub struct Cli {
    /// Config file to read, relative to the base directory
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory the config name is resolved against and the script is
    /// written to. Defaults to the directory holding this executable.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Print the generated script instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Turn the arguments into concrete paths.
    pub fn resolve(&self) -> Result<RunRequest> {
        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => program_dir()?,
        };
        Ok(RunRequest {
            // An absolute config path replaces the base entirely.
            config: base.join(&self.config),
            output: base.join(OUTPUT_FILE),
            dry_run: self.dry_run,
        })
    }
}

/// Directory containing the running executable.
pub fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("Executable path {:?} has no parent directory", exe))
}
