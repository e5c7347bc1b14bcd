// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fmt;

/// What the enumerator does with a binding that fails validation on its own.
///
/// Only binding-local problems (malformed key, malformed value, unknown
/// generator) are subject to the policy. Conflicting declarations and a
/// missing default target always abort the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Abort the whole pass on the first bad binding.
    #[default]
    Strict,
    /// Skip the bad binding, log it, and report it in the result.
    Lenient,
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPolicy::Strict => write!(f, "strict"),
            KeyPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Inputs of an enumeration pass other than the bindings themselves.
///
/// # Example
/// ```
/// use hlgen::enumerator::{EnumerateOptions, KeyPolicy};
///
/// let options = EnumerateOptions::new()
///     .with_default_target("host")
///     .with_policy(KeyPolicy::Lenient)
///     .with_known_generators(vec!["blur".to_string()]);
///
/// assert_eq!(options.default_target.as_deref(), Some("host"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerateOptions {
    /// Target used by configurations without a `target=` token.
    pub default_target: Option<String>,
    pub policy: KeyPolicy,
    /// When set, bindings must name one of these generators, and generators
    /// without any binding still get their implicit default configuration.
    pub known_generators: Option<Vec<String>>,
}

impl EnumerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_target(mut self, target: impl Into<String>) -> Self {
        self.default_target = Some(target.into());
        self
    }

    pub fn with_policy(mut self, policy: KeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_known_generators(mut self, generators: Vec<String>) -> Self {
        self.known_generators = Some(generators);
        self
    }
}
