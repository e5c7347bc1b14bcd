// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{EnumerationError, SourceError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while creating a project or editing its Makefile.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration '{key}' already exists with value '{existing}'")]
    ConfigurationExists { key: String, existing: String },

    #[error("configuration '{key}' is not declared")]
    ConfigurationNotFound { key: String },

    #[error("project directory '{}' already exists", path.display())]
    ProjectExists { path: PathBuf },
}
