// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for reading and editing project files.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Bindings were read from a source.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct BindingsLoaded<'a> {
    pub source: &'a str,
    pub binding_count: usize,
}

impl Display for BindingsLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} binding(s) from {}",
            self.binding_count, self.source
        )
    }
}

impl StructuredLog for BindingsLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            source = self.source,
            binding_count = self.binding_count,
            "{}", self
        );
    }
}

/// Generators were discovered in the project directory.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct GeneratorsDiscovered<'a> {
    pub directory: &'a str,
    pub generators: &'a [String],
}

impl Display for GeneratorsDiscovered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discovered {} generator(s) in {}: {}",
            self.generators.len(),
            self.directory,
            self.generators.join(", ")
        )
    }
}

impl StructuredLog for GeneratorsDiscovered<'_> {
    fn log(&self) {
        tracing::debug!(
            directory = self.directory,
            generator_count = self.generators.len(),
            "{}", self
        );
    }
}

/// A configuration line was written to or removed from a Makefile.
///
/// # Log Level
/// `info!` - The project was modified
///
/// # Example
/// ```
/// use hlgen::observability::messages::project::MakefileEdited;
///
/// let msg = MakefileEdited {
///     path: "Makefile",
///     key: "CFG__blur__fast",
///     action: "added",
///     line: 12,
/// };
///
/// assert_eq!(msg.to_string(), "Configuration 'CFG__blur__fast' added at Makefile:12");
/// ```
pub struct MakefileEdited<'a> {
    pub path: &'a str,
    pub key: &'a str,
    pub action: &'a str,
    pub line: usize,
}

impl Display for MakefileEdited<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration '{}' {} at {}:{}",
            self.key, self.action, self.path, self.line
        )
    }
}

impl StructuredLog for MakefileEdited<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            key = self.key,
            action = self.action,
            line = self.line,
            "{}", self
        );
    }
}

/// A new project directory was written.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ProjectCreated<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub file_count: usize,
}

impl Display for ProjectCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created project '{}' at {} ({} file(s))",
            self.name, self.path, self.file_count
        )
    }
}

impl StructuredLog for ProjectCreated<'_> {
    fn log(&self) {
        tracing::info!(
            project = self.name,
            path = self.path,
            file_count = self.file_count,
            "{}", self
        );
    }
}
