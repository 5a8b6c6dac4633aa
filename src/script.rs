//! Runner script generation.
//!
//! The generated script is two lines: a header marking it as generated,
//! and a single `ant test` invocation carrying one `-D` property per
//! selected option.

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, RunnerError};
use crate::options::PropertyOverride;
use crate::script_traits::ScriptArgs;

/// Build tool invoked by the generated script.
pub const ANT: &str = "ant";

/// Build target run by the generated script.
pub const TEST_TARGET: &str = "test";

/// First line of every generated script.
pub const HEADER: &str = "# Generated file - do not check into git";

/// File name of the generated script.
pub const OUTPUT_FILE: &str = "run_tests.sh";

/// Mode applied after writing: rwxr-xr-x.
pub const SCRIPT_MODE: u32 = 0o755;

/// `ant test` with property overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestInvocation {
    pub overrides: Vec<PropertyOverride>,
}

impl TestInvocation {
    pub fn new(overrides: Vec<PropertyOverride>) -> Self {
        Self { overrides }
    }
}

impl ScriptArgs for TestInvocation {
    fn program(&self) -> &'static str {
        ANT
    }

    fn to_cli_args(&self) -> Vec<String> {
        std::iter::once(TEST_TARGET.to_string())
            .chain(self.overrides.iter().map(PropertyOverride::to_flag))
            .collect()
    }
}

/// Full text of the runner script, trailing newline included.
pub fn render_script<T: ScriptArgs>(invocation: &T) -> String {
    format!("{}\n{}\n", HEADER, invocation.command_line())
}

/// Write `contents` to `path` and mark it executable.
///
/// Existing content at `path` is replaced. The file is flushed and closed
/// before the mode is changed, and the mode is set explicitly so the
/// result does not depend on the process umask.
pub fn write_script(path: &Path, contents: &str) -> Result<()> {
    {
        let mut file = File::create(path).map_err(|e| RunnerError::emit(path, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| RunnerError::emit(path, e))?;
        file.flush().map_err(|e| RunnerError::emit(path, e))?;
    }
    debug!("Wrote {} bytes to {:?}", contents.len(), path);

    fs::set_permissions(path, fs::Permissions::from_mode(SCRIPT_MODE))
        .map_err(|e| RunnerError::emit(path, e))?;
    info!("Generated runner script {:?}", path);

    Ok(())
}
