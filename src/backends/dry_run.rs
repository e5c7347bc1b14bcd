// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::enumerator::Configuration;
use crate::errors::BuildError;
use crate::traits::{BuildEngine, BuildOutcome};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;

/// An engine that builds nothing and remembers what it was asked to build.
#[derive(Debug, Default)]
pub struct DryRunEngine {
    requested: Mutex<Vec<Configuration>>,
}

impl DryRunEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configurations requested so far, in request order.
    pub async fn requested(&self) -> Vec<Configuration> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl BuildEngine for DryRunEngine {
    async fn build(&self, configuration: &Configuration) -> Result<BuildOutcome, BuildError> {
        self.requested.lock().await.push(configuration.clone());
        Ok(BuildOutcome {
            artifact: configuration.artifact.clone(),
            duration: Duration::ZERO,
            output: format!(
                "would build {} (target={}, params='{}')",
                configuration.artifact, configuration.target, configuration.params
            ),
        })
    }

    fn name(&self) -> &'static str {
        "dry_run"
    }
}
