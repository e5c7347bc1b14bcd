// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::enumerator::Enumeration;
use std::fmt;

const COLUMN_PADDING: usize = 1;
const EMPTY_CELL: &str = "(default)";

/// A left-aligned text table with `|` column separators.
#[derive(Debug, Clone, Default)]
pub struct Table {
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Rows shorter than the widest row are padded with empty cells.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        if row.len() > self.widths.len() {
            self.widths.resize(row.len(), 0);
        }
        for (width, cell) in self.widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gutter = " ".repeat(COLUMN_PADDING);
        let separator = format!("{}|{}", gutter, gutter);
        for row in &self.rows {
            let line = self
                .widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", cell, width = width)
                })
                .collect::<Vec<_>>()
                .join(&separator);
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

fn or_default(cell: &str) -> &str {
    if cell.is_empty() {
        EMPTY_CELL
    } else {
        cell
    }
}

/// One row per configuration: generator, configuration, target, params.
///
/// # Example
/// ```
/// use hlgen::binding::BindingSet;
/// use hlgen::enumerator::{enumerate_configurations, EnumerateOptions};
/// use hlgen::project::render_table;
///
/// let bindings = BindingSet::from(vec![("CFG__blur__fast", "target=arm P1")]);
/// let options = EnumerateOptions::new().with_default_target("host");
/// let enumeration = enumerate_configurations(&bindings, &options).unwrap();
///
/// assert_eq!(
///     render_table(&enumeration).to_string(),
///     "GENERATOR | CONFIGURATION | TARGET | PARAMS\n\
///      blur      | (default)     | host   | (default)\n\
///      blur      | fast          | arm    | P1\n"
/// );
/// ```
pub fn render_table(enumeration: &Enumeration) -> Table {
    let mut table = Table::new();
    table.add_row(["GENERATOR", "CONFIGURATION", "TARGET", "PARAMS"]);
    for configuration in enumeration.configurations() {
        table.add_row([
            configuration.generator.as_str(),
            or_default(configuration.suffix.as_deref().unwrap_or("")),
            or_default(&configuration.target),
            or_default(&configuration.params),
        ]);
    }
    table
}
