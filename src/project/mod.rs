// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Project-level operations on top of the enumerator: creating a project,
//! editing the configuration block of its Makefile and rendering
//! configuration tables.

mod editor;
mod scaffold;
mod table;

pub use editor::{
    add_configuration, delete_binding, format_binding_line, insert_binding,
    remove_configuration, MakefileEdit,
};
pub use scaffold::{create_project, halide_directory, halide_directory_from};
pub use table::{render_table, Table};
