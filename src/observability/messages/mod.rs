// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit the same event with its fields attached. Messages
//! that open a unit of work (enumeration, build plan, single build) also
//! implement [`StructuredSpan`].
//!
//! # Organization
//!
//! * `enumeration` - binding parsing and configuration enumeration
//! * `build` - build plan execution
//! * `project` - Makefile reading and editing
//!
//! # Usage Pattern
//!
//! ```rust
//! use hlgen::observability::messages::enumeration::EnumerationCompleted;
//! use hlgen::observability::messages::StructuredLog;
//!
//! let msg = EnumerationCompleted {
//!     generator_count: 2,
//!     configuration_count: 5,
//!     rejected_count: 0,
//! };
//!
//! msg.log();
//! ```

pub mod build;
pub mod enumeration;
pub mod project;

use tracing::Span;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event at its level.
    fn log(&self);
}

/// A message that starts a unit of work and can scope the events inside it.
pub trait StructuredSpan: StructuredLog {
    /// Open a span carrying the message fields.
    fn span(&self, name: &str) -> Span;
}
