// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reads configuration bindings out of a project Makefile.
//!
//! Any line that starts with `CFG__` and contains an assignment is a binding.
//! Every make assignment operator (`=`, `:=`, `::=`, `?=`, `+=`, `!=`) is read
//! as a plain assignment of the right-hand side, and a trailing `# comment` is
//! dropped from the value the way make drops it. Line continuations are not
//! followed.
//!
//! Besides the bindings, the reader records where the configuration block
//! sits so that [`crate::project`] can insert new lines next to the existing
//! ones.

use crate::binding::{Binding, BindingSet, Origin};
use crate::config::consts::{CONFIG_BLOCK_MARKER, KEY_PREFIX};
use crate::errors::SourceError;
use crate::observability::messages::project::BindingsLoaded;
use crate::observability::messages::StructuredLog;
use std::fs;
use std::path::{Path, PathBuf};

/// Position of the configuration block, as 0-based line indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigBlock {
    /// The `# Configure generators` comment line
    pub marker: Option<usize>,
    /// First line after the comment lines that follow the marker
    pub after_marker: Option<usize>,
    /// First binding line
    pub start: Option<usize>,
    /// One past the last binding line of the first contiguous run
    /// (blank lines do not break the run)
    pub end: Option<usize>,
}

impl ConfigBlock {
    /// Where a new binding line should go in a file of `line_count` lines.
    pub fn insertion_index(&self, line_count: usize) -> usize {
        self.end.or(self.after_marker).unwrap_or(line_count)
    }
}

/// A parsed Makefile: its lines, its bindings and its configuration block.
#[derive(Debug, Clone)]
pub struct MakefileSource {
    path: PathBuf,
    lines: Vec<String>,
    line_ending: &'static str,
    bindings: BindingSet,
    block: ConfigBlock,
}

impl MakefileSource {
    /// Read and parse the Makefile at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(path, &contents))
    }

    /// Parse Makefile text; `path` is only used to label binding origins.
    pub fn parse<P: AsRef<Path>>(path: P, contents: &str) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path.display().to_string();
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();
        let line_ending = if contents.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        };

        let mut bindings = BindingSet::new();
        let mut block = ConfigBlock::default();
        let mut last_binding: Option<usize> = None;

        for (index, line) in lines.iter().enumerate() {
            let trimmed = line.trim();

            if trimmed.starts_with(CONFIG_BLOCK_MARKER) && block.marker.is_none() {
                block.marker = Some(index);
            } else if block.marker.is_some()
                && block.after_marker.is_none()
                && !trimmed.starts_with('#')
            {
                block.after_marker = Some(index);
            }

            match parse_binding_line(line) {
                Some((key, value)) => {
                    if block.start.is_none() {
                        block.start = Some(index);
                    }
                    if block.end.is_none() {
                        last_binding = Some(index);
                    }
                    bindings.push(
                        Binding::new(key, value).with_origin(Origin::at_line(&label, index + 1)),
                    );
                }
                None if trimmed.is_empty() => {}
                None => {
                    if block.start.is_some() && block.end.is_none() {
                        block.end = last_binding.map(|i| i + 1);
                    }
                }
            }
        }

        if block.marker.is_some() && block.after_marker.is_none() {
            block.after_marker = Some(lines.len());
        }
        if block.start.is_some() && block.end.is_none() {
            block.end = last_binding.map(|i| i + 1);
        }

        BindingsLoaded {
            source: &label,
            binding_count: bindings.len(),
        }
        .log();

        Self {
            path,
            lines,
            line_ending,
            bindings,
            block,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// `"\r\n"` for a CRLF file, `"\n"` otherwise.
    pub fn line_ending(&self) -> &'static str {
        self.line_ending
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn block(&self) -> &ConfigBlock {
        &self.block
    }
}

/// Split a `CFG__...` assignment line into its key and value.
///
/// Returns `None` for lines that are not configuration bindings.
///
/// # Examples
/// ```
/// use hlgen::sources::parse_binding_line;
///
/// assert_eq!(
///     parse_binding_line("CFG__blur__fast := target=host P1  # tuned"),
///     Some(("CFG__blur__fast".to_string(), "target=host P1".to_string()))
/// );
/// assert_eq!(parse_binding_line("all: blur"), None);
/// ```
pub fn parse_binding_line(line: &str) -> Option<(String, String)> {
    if !line.starts_with(KEY_PREFIX) {
        return None;
    }
    let (lhs, rhs) = line.split_once('=')?;
    let key = lhs
        .trim_end_matches(|c: char| matches!(c, ':' | '?' | '+' | '!'))
        .trim_end();
    Some((key.to_string(), strip_comment(rhs).trim().to_string()))
}

/// Drop a trailing make comment; `\#` is a literal `#`.
fn strip_comment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                out.push('#');
                chars.next();
            }
            '#' => break,
            _ => out.push(c),
        }
    }
    out
}
