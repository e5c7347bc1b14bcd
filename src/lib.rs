// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // build engines
pub mod binding;    // CFG__ key/value tokenizer
pub mod config;     // settings + constants
pub mod engine;     // build plan execution
pub mod enumerator; // bindings -> configurations
pub mod errors;     // error handling
pub mod observability;
pub mod project;    // Makefile editing, tables
pub mod sources;    // Makefile, environment, generator discovery
pub mod traits;     // unified abstractions
