// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::{CommandEngine, DryRunEngine};
use crate::config::Settings;
use crate::engine::executor::BuildExecutor;
use crate::errors::BuildError;
use crate::traits::BuildEngine;
use std::path::Path;
use std::sync::Arc;

/// Factory for creating build engines and executors from settings
pub struct EngineFactory;

impl EngineFactory {
    /// Create a build engine: the dry-run engine when `dry_run` is set,
    /// otherwise the command engine running the configured template from
    /// `project_dir`.
    pub fn from_settings(
        settings: &Settings,
        project_dir: &Path,
        dry_run: bool,
    ) -> Result<Arc<dyn BuildEngine>, BuildError> {
        if dry_run {
            return Ok(Arc::new(DryRunEngine::new()));
        }
        let engine =
            CommandEngine::from_template(settings.build.command_template())?.in_dir(project_dir);
        Ok(Arc::new(engine))
    }

    /// Create an executor honoring the configured concurrency.
    pub fn executor(settings: &Settings) -> BuildExecutor {
        BuildExecutor::new(settings.build.max_concurrency())
    }
}
