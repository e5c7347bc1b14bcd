// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for build plan execution.
//!
//! This module contains message types for logging events related to:
//! * Build plan lifecycle (start, completion)
//! * Per-configuration builds (start, success, failure, cancellation)

use crate::observability::messages::{StructuredLog, StructuredSpan};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Build plan execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use hlgen::observability::messages::build::BuildPlanStarted;
///
/// let msg = BuildPlanStarted {
///     engine: "dry_run",
///     configuration_count: 6,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct BuildPlanStarted<'a> {
    pub engine: &'a str,
    pub configuration_count: usize,
    pub max_concurrency: usize,
}

impl Display for BuildPlanStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Building {} configuration(s) with {} engine, max_concurrency={}",
            self.configuration_count, self.engine, self.max_concurrency
        )
    }
}

impl StructuredLog for BuildPlanStarted<'_> {
    fn log(&self) {
        tracing::info!(
            engine = self.engine,
            configuration_count = self.configuration_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }
}

impl StructuredSpan for BuildPlanStarted<'_> {
    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "build_plan",
            span_name = name,
            engine = self.engine,
            configuration_count = self.configuration_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// A single configuration started building.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ConfigurationBuildStarted<'a> {
    pub artifact: &'a str,
    pub target: &'a str,
    pub params: &'a str,
}

impl Display for ConfigurationBuildStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Building '{}' for target '{}' with params '{}'",
            self.artifact, self.target, self.params
        )
    }
}

impl StructuredLog for ConfigurationBuildStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            artifact = self.artifact,
            build_target = self.target,
            params = self.params,
            "{}", self
        );
    }
}

impl StructuredSpan for ConfigurationBuildStarted<'_> {
    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "configuration_build",
            span_name = name,
            artifact = self.artifact,
            build_target = self.target,
        )
    }
}

/// A single configuration built successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigurationBuildSucceeded<'a> {
    pub artifact: &'a str,
    pub duration: Duration,
}

impl Display for ConfigurationBuildSucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Built '{}' in {:?}", self.artifact, self.duration)
    }
}

impl StructuredLog for ConfigurationBuildSucceeded<'_> {
    fn log(&self) {
        tracing::info!(
            artifact = self.artifact,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// A single configuration failed to build.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use hlgen::observability::messages::build::ConfigurationBuildFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "make not found");
/// let msg = ConfigurationBuildFailed {
///     artifact: "blur_fast",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ConfigurationBuildFailed<'a> {
    pub artifact: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ConfigurationBuildFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to build '{}': {}", self.artifact, self.error)
    }
}

impl StructuredLog for ConfigurationBuildFailed<'_> {
    fn log(&self) {
        tracing::error!(
            artifact = self.artifact,
            error = %self.error,
            "{}", self
        );
    }
}

/// Remaining builds are being cancelled after a failure.
///
/// # Log Level
/// `warn!` - Degraded outcome
pub struct BuildPlanCancelled<'a> {
    pub failed_artifact: &'a str,
}

impl Display for BuildPlanCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cancelling remaining builds after '{}' failed (fail_fast)",
            self.failed_artifact
        )
    }
}

impl StructuredLog for BuildPlanCancelled<'_> {
    fn log(&self) {
        tracing::warn!(failed_artifact = self.failed_artifact, "{}", self);
    }
}

/// Build plan execution finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BuildPlanCompleted {
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub duration: Duration,
}

impl Display for BuildPlanCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Build plan finished in {:?}: {} succeeded, {} failed, {} cancelled",
            self.duration, self.succeeded, self.failed, self.cancelled
        )
    }
}

impl StructuredLog for BuildPlanCompleted {
    fn log(&self) {
        tracing::info!(
            succeeded = self.succeeded,
            failed = self.failed,
            cancelled = self.cancelled,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}
