// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration enumeration events.
//!
//! This module contains message types for logging events related to:
//! * Enumeration lifecycle (start, completion)
//! * Rejected bindings in lenient mode
//! * Idempotent re-declarations
//! * Suppressed default configurations

use crate::observability::messages::{StructuredLog, StructuredSpan};
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Enumeration started over a binding snapshot.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use hlgen::observability::messages::enumeration::EnumerationStarted;
///
/// let msg = EnumerationStarted {
///     binding_count: 4,
///     policy: "strict",
///     default_target: Some("host"),
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct EnumerationStarted<'a> {
    pub binding_count: usize,
    pub policy: &'a str,
    pub default_target: Option<&'a str>,
}

impl Display for EnumerationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Enumerating {} binding(s): policy={}, default_target={}",
            self.binding_count,
            self.policy,
            self.default_target.unwrap_or("(none)")
        )
    }
}

impl StructuredLog for EnumerationStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            binding_count = self.binding_count,
            policy = self.policy,
            default_target = self.default_target,
            "{}", self
        );
    }
}

impl StructuredSpan for EnumerationStarted<'_> {
    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "enumeration",
            span_name = name,
            binding_count = self.binding_count,
            policy = self.policy,
        )
    }
}

/// A binding was skipped because it failed validation in lenient mode.
///
/// # Log Level
/// `warn!` - The plan is incomplete and will not be built
pub struct BindingRejected<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for BindingRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Skipping binding '{}': {}", self.key, self.error)
    }
}

impl StructuredLog for BindingRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            key = self.key,
            value = self.value,
            error = %self.error,
            "{}", self
        );
    }
}

/// The same configuration was declared twice with an identical value.
///
/// # Log Level
/// `debug!` - Harmless, reported for completeness
pub struct RedeclarationIgnored<'a> {
    pub key: &'a str,
}

impl Display for RedeclarationIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Ignoring identical re-declaration of '{}'", self.key)
    }
}

impl StructuredLog for RedeclarationIgnored<'_> {
    fn log(&self) {
        tracing::debug!(key = self.key, "{}", self);
    }
}

/// A generator's default configuration was suppressed by an empty bare key.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use hlgen::observability::messages::enumeration::DefaultConfigurationSuppressed;
///
/// let msg = DefaultConfigurationSuppressed {
///     generator: "blur",
///     suffixed_count: 2,
/// };
///
/// assert!(msg.to_string().contains("blur"));
/// ```
pub struct DefaultConfigurationSuppressed<'a> {
    pub generator: &'a str,
    pub suffixed_count: usize,
}

impl Display for DefaultConfigurationSuppressed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Default configuration of '{}' suppressed; building {} suffixed configuration(s) only",
            self.generator, self.suffixed_count
        )
    }
}

impl StructuredLog for DefaultConfigurationSuppressed<'_> {
    fn log(&self) {
        tracing::debug!(
            generator = self.generator,
            suffixed_count = self.suffixed_count,
            "{}", self
        );
    }
}

/// Enumeration finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EnumerationCompleted {
    pub generator_count: usize,
    pub configuration_count: usize,
    pub rejected_count: usize,
}

impl Display for EnumerationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Enumerated {} configuration(s) across {} generator(s)",
            self.configuration_count, self.generator_count
        )?;
        if self.rejected_count > 0 {
            write!(f, "; {} binding(s) rejected", self.rejected_count)?;
        }
        Ok(())
    }
}

impl StructuredLog for EnumerationCompleted {
    fn log(&self) {
        tracing::info!(
            generator_count = self.generator_count,
            configuration_count = self.configuration_count,
            rejected_count = self.rejected_count,
            "{}", self
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_completed_mentions_rejections_only_when_present() {
        let clean = EnumerationCompleted {
            generator_count: 1,
            configuration_count: 2,
            rejected_count: 0,
        };
        assert_eq!(
            clean.to_string(),
            "Enumerated 2 configuration(s) across 1 generator(s)"
        );

        let partial = EnumerationCompleted {
            generator_count: 1,
            configuration_count: 2,
            rejected_count: 3,
        };
        assert!(partial.to_string().ends_with("; 3 binding(s) rejected"));
    }

    #[test]
    fn test_enumeration_started_without_target() {
        let msg = EnumerationStarted {
            binding_count: 0,
            policy: "lenient",
            default_target: None,
        };
        assert!(msg.to_string().contains("default_target=(none)"));
    }

    #[test]
    fn test_enumeration_span() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let msg = EnumerationStarted {
                binding_count: 4,
                policy: "strict",
                default_target: Some("host"),
            };
            let span = msg.span("enumeration");
            assert_eq!(span.metadata().unwrap().name(), "enumeration");
            assert!(span.metadata().unwrap().fields().field("policy").is_some());
        });
    }
}
