// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while turning raw bindings into configurations.

use crate::binding::Origin;
use thiserror::Error;

/// Why a binding key failed the `CFG__<GENERATOR>[__<SUFFIX>]` convention.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("key does not start with the 'CFG' marker")]
    WrongMarker,

    #[error("key has no generator segment")]
    MissingGenerator,

    #[error("generator name is empty")]
    EmptyGenerator,

    #[error("expected at most 3 '__'-separated segments, found {0}")]
    TooManySegments(usize),

    #[error("segment '{segment}' {reason}")]
    InvalidSegment {
        segment: String,
        reason: &'static str,
    },
}

/// Why a binding value could not be split into target and parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("'target=' token has no target")]
    EmptyTarget,
}

/// Errors that can occur while enumerating generator configurations.
///
/// Every variant carries the offending key (and value where relevant) so the
/// message alone is enough to locate the problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnumerationError {
    /// The key does not follow the naming convention.
    #[error("malformed configuration key '{key}'{}: {reason}", located(.origin))]
    MalformedKey {
        key: String,
        reason: KeyError,
        origin: Option<Origin>,
    },

    /// The value could not be parsed.
    #[error("malformed value for '{key}'{}: {reason} (value: '{value}')", located(.origin))]
    MalformedValue {
        key: String,
        value: String,
        reason: ValueError,
        origin: Option<Origin>,
    },

    /// The same (generator, suffix) pair was declared twice with different values.
    #[error(
        "conflicting declarations of '{key}'{}: '{first}' and '{second}'",
        located(.origin)
    )]
    DuplicateConfiguration {
        key: String,
        first: String,
        second: String,
        origin: Option<Origin>,
    },

    /// A configuration relies on the global default target but none was supplied.
    #[error("configuration '{key}' has no 'target=' token and no default target was supplied (value: '{value}')")]
    MissingDefaultTarget { key: String, value: String },

    /// The binding names a generator that is not part of the project.
    #[error("configuration '{key}'{} names unknown generator '{generator}'", located(.origin))]
    UnknownGenerator {
        key: String,
        generator: String,
        origin: Option<Origin>,
    },
}

impl EnumerationError {
    /// The raw key the error refers to.
    pub fn key(&self) -> &str {
        match self {
            EnumerationError::MalformedKey { key, .. }
            | EnumerationError::MalformedValue { key, .. }
            | EnumerationError::DuplicateConfiguration { key, .. }
            | EnumerationError::MissingDefaultTarget { key, .. }
            | EnumerationError::UnknownGenerator { key, .. } => key,
        }
    }

    /// Whether the error concerns a single binding and may be skipped in lenient mode.
    pub fn is_binding_local(&self) -> bool {
        matches!(
            self,
            EnumerationError::MalformedKey { .. }
                | EnumerationError::MalformedValue { .. }
                | EnumerationError::UnknownGenerator { .. }
        )
    }
}

fn located(origin: &Option<Origin>) -> String {
    match origin {
        Some(origin) => format!(" at {}", origin),
        None => String::new(),
    }
}
