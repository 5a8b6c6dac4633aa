//! Error handling module for cfg-to-runner
//!
//! Every failure in the pipeline is fatal. Each variant carries enough
//! context to print a single diagnostic line, and all of them map to the
//! same non-zero exit status.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for the runner generator
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The input path does not name an existing regular file
    #[error("No such config file {}. Halting.", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// The config file could not be read or is syntactically malformed
    #[error("Test config file {} could not be parsed: {}. Halting.", .path.display(), parse_detail(.line, .message))]
    ConfigParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The config file lacks the required section
    #[error("Test config file {} is missing section {section}. Halting.", .path.display())]
    SectionMissing { path: PathBuf, section: String },

    /// The output script could not be written or made executable
    #[error("Failed to write runner script {}: {source}. Halting.", .path.display())]
    EmitFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `line N: message`, or just the message when no line applies (line 0).
fn parse_detail(line: &usize, message: &str) -> String {
    if *line == 0 {
        message.to_string()
    } else {
        format!("line {}: {}", line, message)
    }
}

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

impl RunnerError {
    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::ConfigNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn section_missing(path: impl AsRef<Path>, section: impl Into<String>) -> Self {
        Self::SectionMissing {
            path: path.as_ref().to_path_buf(),
            section: section.into(),
        }
    }

    pub fn emit(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::EmitFailure {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Process exit status for this error. Every kind halts the run with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::SectionMissing { .. }
            | Self::EmitFailure { .. } => 1,
        }
    }
}
