//! cfg-to-runner - main entry point
//!
//! Reads the test config, writes run_tests.sh next to it, and exits 1 on
//! the first failure.

use tracing::debug;

use cfg_to_runner::cli::Cli;
use cfg_to_runner::runner;

/// Initialize the logger with appropriate settings.
///
/// Logs go to stderr; stdout is reserved for the user-facing diagnostics
/// and `--dry-run` output. `RUST_LOG` overrides the level.
fn init_logger(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed: {:?}", cli);

    let request = cli.resolve()?;
    debug!("Resolved request: {:?}", request);

    match runner::run(&request) {
        Ok(report) => {
            if report.written_to.is_none() {
                print!("{}", report.script);
            }
            debug!("Emitted {} property flags", report.flag_count);
            Ok(())
        }
        Err(e) => {
            debug!("Run failed: {:?}", e);
            println!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
