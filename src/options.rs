//! Recognized test options and their selection from the config.
//!
//! Only the keys in [`CONFIG_OPTS`] are ever forwarded to the build, and
//! always in that order. Downstream tooling that greps the generated
//! script for a flag relies on the left-to-right order.

use std::path::Path;

use tracing::{debug, warn};

use crate::config_file::{ConfigDocument, Section};
use crate::error::{Result, RunnerError};

/// Section of the config file holding the test options.
pub const CFG_SECTION: &str = "UserJobTest";

/// Recognized option keys, in emission order.
pub const CONFIG_OPTS: &[&str] = &[
    "test.user1",
    "test.pwd1",
    "test.token1",
    "test.user2",
    "test.pwd2",
    "test.token2",
    "test.auth.url",
    "test.globus.url",
    "test.mongo.exe",
    "test.temp.dir",
    "test.temp.dir.keep",
];

/// One option forwarded to the build as a `-D` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyOverride {
    pub key: &'static str,
    pub value: String,
}

impl PropertyOverride {
    /// Render as `-D<key>="<value>"`.
    ///
    /// The value is interpolated verbatim. An embedded `"` is not escaped
    /// and will break the quoting of the generated command line.
    pub fn to_flag(&self) -> String {
        format!("-D{}=\"{}\"", self.key, self.value)
    }
}

/// Look up the [`CFG_SECTION`] section of a loaded config.
///
/// `path` is only used to name the file in the error.
pub fn test_section<'a>(doc: &'a ConfigDocument, path: &Path) -> Result<&'a Section> {
    doc.section(CFG_SECTION)
        .ok_or_else(|| RunnerError::section_missing(path, CFG_SECTION))
}

/// Select the recognized options present in `section`, in whitelist order.
///
/// Unrecognized keys are ignored. Empty values are kept. Absent options
/// are skipped; no defaults are filled in.
pub fn select_overrides(section: &Section) -> Vec<PropertyOverride> {
    for (key, _) in section.iter() {
        if !CONFIG_OPTS.contains(&key) {
            debug!("Ignoring unrecognized option {}", key);
        }
    }

    let overrides: Vec<PropertyOverride> = CONFIG_OPTS
        .iter()
        .filter_map(|&key| {
            section.get(key).map(|value| PropertyOverride {
                key,
                value: value.to_string(),
            })
        })
        .collect();

    for o in &overrides {
        if o.value.contains('"') {
            warn!(
                "Value of {} contains a double quote; the generated command line will not quote it correctly",
                o.key
            );
        }
    }

    overrides
}
