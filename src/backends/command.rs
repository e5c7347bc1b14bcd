// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runs an external command once per configuration.
//!
//! The command is given as a whitespace-separated template. Each word may
//! contain placeholders that are replaced per configuration:
//!
//! | Placeholder   | Replaced with                         |
//! |---------------|---------------------------------------|
//! | `{generator}` | generator name                        |
//! | `{suffix}`    | suffix, empty for the default         |
//! | `{artifact}`  | `<generator>` or `<generator>_<suffix>` |
//! | `{target}`    | resolved target                       |
//! | `{params}`    | parameters, as a single argument      |
//!
//! No shell is involved, so `{params}` stays one argument even when it
//! contains spaces; `GENERATOR_ARGS={params}` reaches make as one assignment.

use crate::enumerator::Configuration;
use crate::errors::BuildError;
use crate::traits::{BuildEngine, BuildOutcome};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Instant;
use tokio::process::Command;

/// Keep the tail of stderr in error messages readable.
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandEngine {
    /// Build an engine from a command template such as
    /// `make {artifact} HL_TARGET={target} GENERATOR_ARGS={params}`.
    pub fn from_template(template: &str) -> Result<Self, BuildError> {
        let mut words = template.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(BuildError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
            working_dir: None,
        })
    }

    /// Run the command from `dir` instead of the current directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The argument list for `configuration`, placeholders expanded.
    pub fn arguments(&self, configuration: &Configuration) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| expand(arg, configuration))
            .collect()
    }
}

fn expand(word: &str, configuration: &Configuration) -> String {
    word.replace("{generator}", &configuration.generator)
        .replace("{suffix}", configuration.suffix.as_deref().unwrap_or(""))
        .replace("{artifact}", &configuration.artifact)
        .replace("{target}", &configuration.target)
        .replace("{params}", &configuration.params)
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim_end().lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[async_trait]
impl BuildEngine for CommandEngine {
    async fn build(&self, configuration: &Configuration) -> Result<BuildOutcome, BuildError> {
        let started = Instant::now();
        let mut command = Command::new(&self.program);
        command
            .args(self.arguments(configuration))
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|source| BuildError::Spawn {
            artifact: configuration.artifact.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(BuildError::CommandFailed {
                artifact: configuration.artifact.clone(),
                status: output.status.code(),
                stderr: tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_LINES),
            });
        }

        Ok(BuildOutcome {
            artifact: configuration.artifact.clone(),
            duration: started.elapsed(),
            output: String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "command"
    }
}
