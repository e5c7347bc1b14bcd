// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Where binding snapshots and generator names come from.

mod discovery;
mod environment;
mod makefile;

pub use discovery::discover_generators;
pub use environment::{bindings_from_env, bindings_from_vars};
pub use makefile::{parse_binding_line, ConfigBlock, MakefileSource};
