// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod build;
mod enumeration;
mod project;
mod settings;
mod source;

pub use build::{BuildError, FailureStrategy};
pub use enumeration::{EnumerationError, KeyError, ValueError};
pub use project::ProjectError;
pub use settings::SettingsError;
pub use source::SourceError;
