// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::enumerator::Configuration;
use crate::errors::BuildError;
use async_trait::async_trait;
use std::time::Duration;

/// What a successful build of one configuration produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub artifact: String,
    pub duration: Duration,
    /// Engine-specific output, e.g. captured stdout
    pub output: String,
}

/// The external collaborator that actually compiles and links an artifact.
///
/// Engines are shared between concurrently running builds.
#[async_trait]
pub trait BuildEngine: Send + Sync {
    async fn build(&self, configuration: &Configuration) -> Result<BuildOutcome, BuildError>;

    fn name(&self) -> &'static str;
}
