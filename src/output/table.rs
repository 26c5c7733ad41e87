//
//  bitbucket-checkout
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Builder over `comfy_table` for rendering UTF-8 tables in the terminal.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_checkout::output::TableBuilder;
//!
//! let table = TableBuilder::new()
//!     .color(false)
//!     .headers(["Remote", "URL"])
//!     .row(["origin", "git@bitbucket.org:tester/test-repo.git"])
//!     .build();
//! assert!(table.to_string().contains("origin"));
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates a new styled table with default settings.
///
/// The table uses the UTF-8 full border preset and arranges content
/// dynamically to fit the terminal width.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// A builder for constructing formatted tables with a fluent API.
///
/// Headers are cyan when color is enabled. Color support is detected on
/// creation; use [`color`](TableBuilder::color) to override it.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    /// Creates a new table builder with default settings.
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    /// Sets whether color output is enabled.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the table headers.
    ///
    /// # Notes
    ///
    /// Set headers after [`color`](TableBuilder::color), since styling is
    /// applied here.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(|s| s.into()).collect();
        if self.color {
            let header_cells: Vec<Cell> = headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect();
            self.table.set_header(header_cells);
        } else {
            self.table.set_header(headers);
        }
        self
    }

    /// Adds a single row to the table.
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(|s| s.into()).collect();
        self.table.add_row(row);
        self
    }

    /// Adds multiple rows to the table at once.
    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            let row: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            self.table.add_row(row);
        }
        self
    }

    /// Builds and prints the table to stdout.
    pub fn print(self) {
        println!("{}", self.table);
    }

    /// Builds and returns the underlying table.
    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_renders_rows() {
        let rendered = TableBuilder::new()
            .color(false)
            .headers(["Remote", "URL"])
            .rows([["origin", "https://bitbucket.org/a/b.git"], ["upstream", "x"]])
            .build()
            .to_string();
        assert!(rendered.contains("Remote"));
        assert!(rendered.contains("https://bitbucket.org/a/b.git"));
        assert!(rendered.contains("upstream"));
    }
}
