// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The "build all configurations" entry point.
//!
//! Every configuration of an [`Enumeration`] is handed to a [`BuildEngine`].
//! Builds are independent of each other, so they run as concurrent tokio
//! tasks limited by a semaphore. Under [`FailureStrategy::FailFast`] the first
//! failure cancels every build that has not finished yet through a shared
//! `CancellationToken`; under [`FailureStrategy::ContinueOnError`] all builds
//! run and failures are collected into the [`BuildReport`].
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use hlgen::backends::DryRunEngine;
//! use hlgen::binding::BindingSet;
//! use hlgen::engine::BuildExecutor;
//! use hlgen::enumerator::{enumerate_configurations, EnumerateOptions};
//! use hlgen::errors::FailureStrategy;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bindings = BindingSet::from(vec![("CFG__blur__fast", "vectorize=true")]);
//! let options = EnumerateOptions::new().with_default_target("host");
//! let enumeration = enumerate_configurations(&bindings, &options)?;
//!
//! let engine = Arc::new(DryRunEngine::new());
//! let report = BuildExecutor::new(2)
//!     .execute(&enumeration, engine.clone(), FailureStrategy::FailFast)
//!     .await?;
//!
//! assert_eq!(report.succeeded.len(), 2);
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

use crate::enumerator::{Configuration, Enumeration};
use crate::errors::{BuildError, FailureStrategy};
use crate::observability::messages::build::{
    BuildPlanCancelled, BuildPlanCompleted, BuildPlanStarted, ConfigurationBuildFailed,
    ConfigurationBuildStarted, ConfigurationBuildSucceeded,
};
use crate::observability::messages::{StructuredLog, StructuredSpan};
use crate::traits::{BuildEngine, BuildOutcome};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// A configuration that failed to build.
#[derive(Debug)]
pub struct BuildFailure {
    pub artifact: String,
    pub error: BuildError,
}

/// Outcome of a whole build plan.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Successful builds, in plan order
    pub succeeded: Vec<BuildOutcome>,
    /// Failed builds, in plan order
    pub failed: Vec<BuildFailure>,
    /// Artifacts whose build was cancelled
    pub cancelled: Vec<String>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.cancelled.is_empty()
    }
}

/// Runs a build plan with bounded concurrency.
#[derive(Debug, Clone)]
pub struct BuildExecutor {
    max_concurrency: usize,
}

impl BuildExecutor {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Build every configuration of `enumeration` with `engine`.
    ///
    /// # Errors
    /// * `IncompleteEnumeration` before anything is built, if lenient
    ///   enumeration rejected bindings
    /// * the first build error under `FailFast`
    pub async fn execute(
        &self,
        enumeration: &Enumeration,
        engine: Arc<dyn BuildEngine>,
        failure_strategy: FailureStrategy,
    ) -> Result<BuildReport, BuildError> {
        if !enumeration.is_complete() {
            return Err(BuildError::IncompleteEnumeration {
                rejected: enumeration.rejected.len(),
            });
        }

        let started = Instant::now();
        let plan = BuildPlanStarted {
            engine: engine.name(),
            configuration_count: enumeration.configuration_count(),
            max_concurrency: self.max_concurrency,
        };
        plan.log();

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let cancellation = CancellationToken::new();
        let mut tasks = JoinSet::new();

        let plan_span = plan.span("build_plan");
        let mut pending: HashMap<task::Id, (usize, String)> = HashMap::new();

        for (index, configuration) in enumeration.configurations().cloned().enumerate() {
            let semaphore = semaphore.clone();
            let cancellation = cancellation.clone();
            let engine = engine.clone();
            let artifact = configuration.artifact.clone();
            let handle = tasks.spawn(
                async move { build_one(&configuration, engine, semaphore, cancellation).await }
                    .instrument(plan_span.clone()),
            );
            pending.insert(handle.id(), (index, artifact));
        }

        let mut succeeded: Vec<(usize, BuildOutcome)> = Vec::new();
        let mut failed: Vec<(usize, BuildFailure)> = Vec::new();
        let mut cancelled: Vec<(usize, String)> = Vec::new();
        let mut first_failure: Option<BuildError> = None;

        while let Some(joined) = tasks.join_next_with_id().await {
            // A panicking or aborted task is a failure of its configuration.
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(join_error) => (
                    join_error.id(),
                    Err(BuildError::Join(join_error.to_string())),
                ),
            };
            let Some((index, artifact)) = pending.remove(&id) else {
                continue;
            };

            match result {
                Ok(outcome) => succeeded.push((index, outcome)),
                Err(error) if error.is_cancelled() => cancelled.push((index, artifact)),
                Err(error) => {
                    ConfigurationBuildFailed {
                        artifact: &artifact,
                        error: &error,
                    }
                    .log();
                    if failure_strategy == FailureStrategy::FailFast {
                        if first_failure.is_none() {
                            BuildPlanCancelled {
                                failed_artifact: &artifact,
                            }
                            .log();
                            cancellation.cancel();
                            first_failure = Some(error);
                        }
                        continue;
                    }
                    failed.push((index, BuildFailure { artifact, error }));
                }
            }
        }

        BuildPlanCompleted {
            succeeded: succeeded.len(),
            failed: failed.len() + usize::from(first_failure.is_some()),
            cancelled: cancelled.len(),
            duration: started.elapsed(),
        }
        .log();

        if let Some(error) = first_failure {
            return Err(error);
        }

        succeeded.sort_by_key(|(index, _)| *index);
        failed.sort_by_key(|(index, _)| *index);
        cancelled.sort_by_key(|(index, _)| *index);
        Ok(BuildReport {
            succeeded: succeeded.into_iter().map(|(_, o)| o).collect(),
            failed: failed.into_iter().map(|(_, f)| f).collect(),
            cancelled: cancelled.into_iter().map(|(_, a)| a).collect(),
        })
    }
}

async fn build_one(
    configuration: &Configuration,
    engine: Arc<dyn BuildEngine>,
    semaphore: Arc<Semaphore>,
    cancellation: CancellationToken,
) -> Result<BuildOutcome, BuildError> {
    let cancelled = || BuildError::Cancelled {
        artifact: configuration.artifact.clone(),
    };

    let _permit = tokio::select! {
        _ = cancellation.cancelled() => return Err(cancelled()),
        permit = semaphore.acquire_owned() => permit.map_err(|_| cancelled())?,
    };

    let start = ConfigurationBuildStarted {
        artifact: &configuration.artifact,
        target: &configuration.target,
        params: &configuration.params,
    };
    start.log();

    let started = Instant::now();
    let outcome = tokio::select! {
        _ = cancellation.cancelled() => return Err(cancelled()),
        outcome = engine.build(configuration).instrument(start.span("configuration_build")) => outcome?,
    };

    ConfigurationBuildSucceeded {
        artifact: &configuration.artifact,
        duration: started.elapsed(),
    }
    .log();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::DryRunEngine;
    use crate::binding::BindingSet;
    use crate::enumerator::{enumerate_configurations, EnumerateOptions, KeyPolicy};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fails for the listed artifacts, optionally after a delay.
    struct ScriptedEngine {
        failing: Vec<&'static str>,
        delay: Duration,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ScriptedEngine {
        fn new(failing: Vec<&'static str>, delay: Duration) -> Self {
            Self {
                failing,
                delay,
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BuildEngine for ScriptedEngine {
        async fn build(&self, configuration: &Configuration) -> Result<BuildOutcome, BuildError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(&configuration.artifact.as_str()) {
                return Err(BuildError::EngineFailed {
                    artifact: configuration.artifact.clone(),
                    reason: "simulated failure".to_string(),
                });
            }
            Ok(BuildOutcome {
                artifact: configuration.artifact.clone(),
                duration: self.delay,
                output: String::new(),
            })
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn plan(pairs: Vec<(&str, &str)>) -> Enumeration {
        let options = EnumerateOptions::new().with_default_target("host");
        enumerate_configurations(&BindingSet::from(pairs), &options).unwrap()
    }

    fn artifacts(outcomes: &[BuildOutcome]) -> Vec<&str> {
        outcomes.iter().map(|o| o.artifact.as_str()).collect()
    }

    #[tokio::test]
    async fn test_builds_every_configuration_in_plan_order() {
        let enumeration = plan(vec![
            ("CFG__blur__fast", "P1"),
            ("CFG__sharpen", "P0"),
            ("CFG__sharpen__hq", "target=x P2"),
        ]);
        let engine = Arc::new(DryRunEngine::new());

        let report = BuildExecutor::new(4)
            .execute(&enumeration, engine.clone(), FailureStrategy::FailFast)
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(
            artifacts(&report.succeeded),
            vec!["blur", "blur_fast", "sharpen", "sharpen_hq"]
        );
        assert_eq!(engine.requested().await.len(), 4);
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let report = BuildExecutor::new(1)
            .execute(
                &Enumeration::default(),
                Arc::new(DryRunEngine::new()),
                FailureStrategy::FailFast,
            )
            .await
            .unwrap();
        assert!(report.succeeded.is_empty());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_incomplete_enumeration_is_refused() {
        let options = EnumerateOptions::new()
            .with_default_target("host")
            .with_policy(KeyPolicy::Lenient);
        let bindings = BindingSet::from(vec![("CFG__a__b__c", ""), ("CFG__ok", "")]);
        let enumeration = enumerate_configurations(&bindings, &options).unwrap();
        let engine = Arc::new(DryRunEngine::new());

        let err = BuildExecutor::new(2)
            .execute(&enumeration, engine.clone(), FailureStrategy::ContinueOnError)
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::IncompleteEnumeration { rejected: 1 }));
        assert!(engine.requested().await.is_empty());
    }

    #[tokio::test]
    async fn test_continue_on_error_collects_failures() {
        let enumeration = plan(vec![
            ("CFG__a__one", ""),
            ("CFG__a__two", ""),
            ("CFG__b", ""),
        ]);
        let engine = Arc::new(ScriptedEngine::new(
            vec!["a_one", "b"],
            Duration::from_millis(1),
        ));

        let report = BuildExecutor::new(2)
            .execute(&enumeration, engine, FailureStrategy::ContinueOnError)
            .await
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(artifacts(&report.succeeded), vec!["a", "a_two"]);
        let failed: Vec<&str> = report.failed.iter().map(|f| f.artifact.as_str()).collect();
        assert_eq!(failed, vec!["a_one", "b"]);
        assert!(report.cancelled.is_empty());
    }

    #[tokio::test]
    async fn test_fail_fast_returns_first_failure() {
        let enumeration = plan(vec![("CFG__a__bad", ""), ("CFG__b", ""), ("CFG__c", "")]);
        let engine = Arc::new(ScriptedEngine::new(vec!["a_bad"], Duration::from_millis(5)));

        let err = BuildExecutor::new(1)
            .execute(&enumeration, engine, FailureStrategy::FailFast)
            .await
            .unwrap_err();

        match err {
            BuildError::EngineFailed { artifact, .. } => assert_eq!(artifact, "a_bad"),
            other => panic!("expected EngineFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let pairs: Vec<(String, String)> = (0..8)
            .map(|i| (format!("CFG__gen__v{}", i), String::new()))
            .collect();
        let options = EnumerateOptions::new().with_default_target("host");
        let bindings: BindingSet = pairs.into_iter().collect();
        let enumeration = enumerate_configurations(&bindings, &options).unwrap();
        let engine = Arc::new(ScriptedEngine::new(vec![], Duration::from_millis(10)));

        let report = BuildExecutor::new(3)
            .execute(&enumeration, engine.clone(), FailureStrategy::FailFast)
            .await
            .unwrap();

        assert_eq!(report.succeeded.len(), 9);
        assert!(engine.peak.load(Ordering::SeqCst) <= 3);
    }

    /// Panics instead of returning an error for `a_bad`.
    struct PanickingEngine;

    #[async_trait]
    impl BuildEngine for PanickingEngine {
        async fn build(&self, configuration: &Configuration) -> Result<BuildOutcome, BuildError> {
            if configuration.artifact == "a_bad" {
                panic!("engine blew up on {}", configuration.artifact);
            }
            Ok(BuildOutcome {
                artifact: configuration.artifact.clone(),
                duration: Duration::ZERO,
                output: String::new(),
            })
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn test_panicking_build_is_reported_as_failed() {
        let enumeration = plan(vec![("CFG__a__bad", "")]);

        let report = BuildExecutor::new(2)
            .execute(&enumeration, Arc::new(PanickingEngine), FailureStrategy::ContinueOnError)
            .await
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(artifacts(&report.succeeded), vec!["a"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].artifact, "a_bad");
        assert!(matches!(report.failed[0].error, BuildError::Join(_)));
    }

    #[tokio::test]
    async fn test_panicking_build_fails_fast() {
        let enumeration = plan(vec![("CFG__a__bad", "")]);

        let err = BuildExecutor::new(1)
            .execute(&enumeration, Arc::new(PanickingEngine), FailureStrategy::FailFast)
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::Join(_)));
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        assert_eq!(BuildExecutor::new(0).max_concurrency(), 1);
    }
}
