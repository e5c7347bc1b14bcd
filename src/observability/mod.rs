// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging in hlgen. Message types follow a struct-based pattern with `Display`
//! implementations so that log text lives in one place and every event carries
//! structured fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::enumeration` - binding parsing and configuration enumeration
//! * `messages::build` - build plan execution
//! * `messages::project` - Makefile reading, generator discovery and editing
//!
//! # Usage
//!
//! ```rust
//! use hlgen::observability::messages::build::ConfigurationBuildFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = ConfigurationBuildFailed {
//!     artifact: "blur_fast",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```
//!
//! The binary installs a `tracing-subscriber` formatter filtered by `RUST_LOG`.

pub mod messages;
