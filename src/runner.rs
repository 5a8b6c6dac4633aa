//! Load → Extract → Emit.
//!
//! Each step either succeeds or aborts the whole run; there is no
//! fallback anywhere. The required section is checked before the output
//! file is opened, so a config without it never touches the output.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config_file::{ensure_config_file, ConfigDocument};
use crate::error::Result;
use crate::options::{select_overrides, test_section};
use crate::script::{render_script, write_script, TestInvocation};

/// Fully resolved inputs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Config file to read.
    pub config: PathBuf,
    /// Where the runner script is written.
    pub output: PathBuf,
    /// Render the script but do not write it.
    pub dry_run: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub script: String,
    /// `None` for a dry run.
    pub written_to: Option<PathBuf>,
    pub flag_count: usize,
}

/// Generate the runner script described by `request`.
///
/// Prints `Using test config file <path>` once the config file is known
/// to exist: to stdout normally, to stderr on a dry run so that stdout
/// carries only the script.
pub fn run(request: &RunRequest) -> Result<RunReport> {
    let config = ensure_config_file(&request.config)?;
    if request.dry_run {
        eprintln!("Using test config file {}", config.display());
    } else {
        println!("Using test config file {}", config.display());
    }

    let doc = ConfigDocument::parse_file(config)?;
    let section = test_section(&doc, config)?;
    let overrides = select_overrides(section);
    debug!(
        "Selected options: {:?}",
        overrides.iter().map(|o| o.key).collect::<Vec<_>>()
    );

    let flag_count = overrides.len();
    let script = render_script(&TestInvocation::new(overrides));

    if request.dry_run {
        info!("Dry run: not writing {:?}", request.output);
        return Ok(RunReport {
            script,
            written_to: None,
            flag_count,
        });
    }

    write_script(&request.output, &script)?;
    Ok(RunReport {
        script,
        written_to: Some(request.output.clone()),
        flag_count,
    })
}
