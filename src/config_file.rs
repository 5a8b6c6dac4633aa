//! Test configuration file loading.
//!
//! The config file is a line-oriented INI dialect:
//!
//! ```text
//! # comment
//! [UserJobTest]
//! test.user1 = alice
//! test.pwd1 = "p a s s"     # quotes are stripped, inner text kept verbatim
//! [[nested]]                # subsection of UserJobTest
//! ```
//!
//! Only the document structure is checked here. Values are never
//! validated; any string is accepted.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::error::{Result, RunnerError};

/// Syntax error in a config file, with its 1-based line number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// A named group of `key = value` entries, possibly with nested subsections.
///
/// Entries keep file order; keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    entries: Vec<(String, String)>,
    subsections: Vec<(String, Section)>,
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subsection(&self, name: &str) -> Option<&Section> {
        self.subsections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn subsection_names(&self) -> impl Iterator<Item = &str> {
        self.subsections.iter().map(|(n, _)| n.as_str())
    }

    fn insert(&mut self, key: String, value: String) -> std::result::Result<(), String> {
        if self.contains_key(&key) {
            return Err(format!("duplicate key `{}`", key));
        }
        self.entries.push((key, value));
        Ok(())
    }
}

/// A parsed config file.
///
/// Entries that appear before the first section header live in the root
/// section; named sections hang off the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    root: Section,
}

impl ConfigDocument {
    /// Load and parse a config file.
    ///
    /// Fails with [`RunnerError::ConfigNotFound`] before reading anything
    /// if `path` is not an existing regular file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = ensure_config_file(path.as_ref())?;
        Self::parse_file(path)
    }

    /// Read and parse a file already checked by [`ensure_config_file`].
    pub fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RunnerError::ConfigParse {
            path: path.to_path_buf(),
            line: 0,
            message: e.to_string(),
        })?;

        let doc = content.parse::<Self>().map_err(|e: ParseError| RunnerError::ConfigParse {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;

        debug!(
            "Parsed {:?}: sections={:?}",
            path,
            doc.section_names().collect::<Vec<_>>()
        );
        Ok(doc)
    }

    /// Top-level section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.root.subsection(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.root.subsection_names()
    }

    /// Entries that appear before any section header.
    pub fn root(&self) -> &Section {
        &self.root
    }
}

/// Fail with [`RunnerError::ConfigNotFound`] unless `path` is an existing
/// regular file.
pub fn ensure_config_file(path: &Path) -> Result<&Path> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(RunnerError::config_not_found(path))
    }
}

impl FromStr for ConfigDocument {
    type Err = ParseError;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        let mut root = Section::default();
        // Open sections, outermost first, with their bracket depth.
        let mut open: Vec<(usize, String, Section)> = Vec::new();

        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines().enumerate();

        while let Some((idx, raw)) = lines.next() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                let (depth, name) = parse_header(line).map_err(|m| ParseError::new(line_no, m))?;

                while open.len() >= depth {
                    close_section(&mut open, &mut root);
                }
                if depth > open.len() + 1 {
                    return Err(ParseError::new(
                        line_no,
                        format!("section `{}` is nested too deeply", name),
                    ));
                }

                let parent = open.last().map(|(_, _, s)| s).unwrap_or(&root);
                if parent.subsection(&name).is_some() {
                    return Err(ParseError::new(
                        line_no,
                        format!("duplicate section `{}`", name),
                    ));
                }

                open.push((depth, name, Section::default()));
                continue;
            }

            let (key, value) =
                parse_entry(line, &mut lines).map_err(|m| ParseError::new(line_no, m))?;
            let target = match open.last_mut() {
                Some((_, _, section)) => section,
                None => &mut root,
            };
            target
                .insert(key, value)
                .map_err(|m| ParseError::new(line_no, m))?;
        }

        while !open.is_empty() {
            close_section(&mut open, &mut root);
        }

        Ok(Self { root })
    }
}

/// Pop the innermost open section and attach it to its parent.
fn close_section(open: &mut Vec<(usize, String, Section)>, root: &mut Section) {
    if let Some((_, name, section)) = open.pop() {
        let parent = match open.last_mut() {
            Some((_, _, s)) => s,
            None => root,
        };
        parent.subsections.push((name, section));
    }
}

/// Parse `[name]`, `[[name]]`, ... into (depth, name).
fn parse_header(line: &str) -> std::result::Result<(usize, String), String> {
    let header = match line.find('#') {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    };

    let depth = header.chars().take_while(|&c| c == '[').count();
    let closing = header.chars().rev().take_while(|&c| c == ']').count();
    if closing == 0 {
        return Err(format!("unterminated section header `{}`", line));
    }
    if closing != depth || header.len() < depth + closing {
        return Err(format!("mismatched brackets in section header `{}`", line));
    }

    let name = unquote(header[depth..header.len() - closing].trim());
    if name.is_empty() {
        return Err(format!("empty section name in `{}`", line));
    }
    Ok((depth, name.to_string()))
}

/// Parse `key = value`. A triple-quoted value may continue on the
/// following lines, which are taken from `more`.
fn parse_entry<'a>(
    line: &str,
    more: &mut dyn Iterator<Item = (usize, &'a str)>,
) -> std::result::Result<(String, String), String> {
    let Some((key, rest)) = line.split_once('=') else {
        return Err(format!("expected `key = value`, found `{}`", line));
    };

    let key = unquote(key.trim());
    if key.is_empty() {
        return Err(format!("missing key in `{}`", line));
    }

    let value = parse_value(rest.trim(), more)?;
    Ok((key.to_string(), value))
}

/// Strip surrounding quotes from a value; drop a trailing `# comment`.
fn parse_value<'a>(
    rest: &str,
    more: &mut dyn Iterator<Item = (usize, &'a str)>,
) -> std::result::Result<String, String> {
    let quote = match rest.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => {
            let unquoted = match rest.find('#') {
                Some(pos) => &rest[..pos],
                None => rest,
            };
            return Ok(unquoted.trim_end().to_string());
        }
    };

    let triple: String = std::iter::repeat_n(quote, 3).collect();
    let delim = if rest.starts_with(&triple) {
        triple.as_str()
    } else {
        &rest[..1]
    };

    let body = &rest[delim.len()..];
    if let Some(end) = body.find(delim) {
        check_after_quote(&body[end + delim.len()..], rest)?;
        return Ok(body[..end].to_string());
    }

    if delim.len() == 3 {
        // Continuation lines are kept raw, joined with newlines.
        let mut value = body.to_string();
        for (_, next) in more {
            value.push('\n');
            if let Some(end) = next.find(delim) {
                check_after_quote(&next[end + delim.len()..], next)?;
                value.push_str(&next[..end]);
                return Ok(value);
            }
            value.push_str(next);
        }
    }

    Err(format!("unterminated quoted value `{}`", rest))
}

/// Only a comment may follow a closing quote.
fn check_after_quote(tail: &str, context: &str) -> std::result::Result<(), String> {
    let tail = tail.trim_start();
    if tail.is_empty() || tail.starts_with('#') {
        Ok(())
    } else {
        Err(format!("unexpected text after quoted value `{}`", context))
    }
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
