// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Build engine backends.
//!
//! Each backend implements the [`BuildEngine`](crate::traits::BuildEngine)
//! trait and is handed to the build executor as a shared trait object.
//!
//! # Available Backends
//!
//! ## Command Backend
//! Runs an external command per configuration, `make` by default:
//! - **Templating**: `{generator}`, `{suffix}`, `{artifact}`, `{target}`, `{params}`
//! - **Failure reporting**: exit status and the tail of stderr
//! - **Use Case**: real builds delegated to the project's build system
//!
//! ## Dry-Run Backend
//! Records every requested configuration without building anything:
//! - **Use Case**: previewing a build plan, testing the executor
//!
//! # Examples
//!
//! ```rust
//! use hlgen::backends::CommandEngine;
//! use hlgen::traits::BuildEngine;
//!
//! let engine = CommandEngine::from_template("make {artifact} HL_TARGET={target}")?;
//! assert_eq!(engine.name(), "command");
//! # Ok::<(), hlgen::errors::BuildError>(())
//! ```

pub mod command;
pub mod dry_run;

pub use command::CommandEngine;
pub use dry_run::DryRunEngine;
