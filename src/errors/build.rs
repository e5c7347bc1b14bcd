// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors and failure handling for the build stage.

use serde::Deserialize;
use thiserror::Error;

/// How the build executor reacts when one configuration fails to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Cancel every pending build and report the first failure.
    #[default]
    FailFast,
    /// Build every configuration and report all failures at the end.
    ContinueOnError,
}

/// Errors produced while building configurations.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The enumeration skipped bindings, so the plan is incomplete.
    #[error("refusing to build: {rejected} binding(s) were rejected during enumeration")]
    IncompleteEnumeration { rejected: usize },

    /// The build command could not be started.
    #[error("failed to start build of '{artifact}': {source}")]
    Spawn {
        artifact: String,
        #[source]
        source: std::io::Error,
    },

    /// The build command ran and exited unsuccessfully.
    #[error("build of '{artifact}' failed with {}: {stderr}", describe_status(.status))]
    CommandFailed {
        artifact: String,
        status: Option<i32>,
        stderr: String,
    },

    /// The build engine reported a failure of its own.
    #[error("build of '{artifact}' failed: {reason}")]
    EngineFailed { artifact: String, reason: String },

    /// The build was cancelled after another configuration failed.
    #[error("build of '{artifact}' was cancelled")]
    Cancelled { artifact: String },

    /// A build task panicked or was aborted.
    #[error("build task failed: {0}")]
    Join(String),

    /// The command template is empty.
    #[error("build command template is empty")]
    EmptyCommand,
}

impl BuildError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BuildError::Cancelled { .. })
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
