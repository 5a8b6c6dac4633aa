//! cfg-to-runner library
//!
//! Turns the `UserJobTest` section of a test credentials config into an
//! executable `run_tests.sh` that runs `ant test` with `-D` overrides.

pub mod cli;
pub mod config_file;
pub mod error;
pub mod options;
pub mod runner;
pub mod script;
pub mod script_traits;

// Re-export main types for convenience
pub use config_file::{ensure_config_file, ConfigDocument, ParseError, Section};
pub use error::RunnerError;
pub use options::{select_overrides, test_section, PropertyOverride, CFG_SECTION, CONFIG_OPTS};
pub use runner::{run, RunReport, RunRequest};
pub use script::{render_script, write_script, TestInvocation, OUTPUT_FILE};
pub use script_traits::ScriptArgs;
