// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::GENERATOR_FILE_SUFFIX;
use crate::errors::SourceError;
use crate::observability::messages::project::GeneratorsDiscovered;
use crate::observability::messages::StructuredLog;
use std::fs;
use std::path::Path;

/// Names of the generators in `dir`: the stems of its `*.gen.cpp` files, sorted.
pub fn discover_generators<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, SourceError> {
    let dir = dir.as_ref();
    let io_error = |source: std::io::Error| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut generators = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        if !entry.file_type().map_err(io_error)?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(stem) = name.strip_suffix(GENERATOR_FILE_SUFFIX) {
            if !stem.is_empty() {
                generators.push(stem.to_string());
            }
        }
    }
    generators.sort();

    GeneratorsDiscovered {
        directory: &dir.display().to_string(),
        generators: &generators,
    }
    .log();
    Ok(generators)
}
