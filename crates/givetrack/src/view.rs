//! The view surface the trackers drive.
//!
//! Trackers never format output themselves: they hand rows, totals and
//! messages to a [`TrackerView`]. [`BufferedView`] keeps the last content of
//! each region and can print it as a terminal table.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a row's delete control addresses its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteKey {
    /// Position in the stored collection.
    Index(usize),
    /// Stored record id.
    Id(i64),
}

impl std::fmt::Display for DeleteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Cell texts, in column order.
    pub cells: Vec<String>,
    /// What the row's delete control removes.
    pub delete: DeleteKey,
}

/// Capabilities a tracker needs from its presentation layer.
pub trait TrackerView {
    /// Replace every table row with `rows`.
    fn render_rows(&mut self, rows: &[TableRow]);

    /// Replace the totals label.
    fn render_total(&mut self, text: &str);

    /// Replace the error region's text.
    fn show_error(&mut self, text: &str);

    /// Empty the error region.
    fn clear_error(&mut self) {
        self.show_error("");
    }

    /// Replace the result region's text.
    fn show_result(&mut self, text: &str);

    /// Reset the input form.
    fn clear_form(&mut self);
}

/// Output format for rendered collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Tab-separated rows followed by the total
    #[default]
    Plain,
    /// Aligned table with a header
    Table,
    /// The stored JSON collection
    Json,
}

/// A view that remembers the latest content of every region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedView {
    /// Current table rows.
    pub rows: Vec<TableRow>,
    /// Current totals label.
    pub total: String,
    /// Current error region text.
    pub error: String,
    /// Current result region text.
    pub result: String,
    /// How many times the form was reset.
    pub forms_cleared: usize,
}

impl BufferedView {
    /// Create an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render rows and total as text.
    ///
    /// `headers` names the delete-key column followed by the cell columns.
    /// The total is written last, after `total_caption`.
    #[must_use]
    pub fn to_text(&self, headers: &[&str], total_caption: &str, format: OutputFormat) -> String {
        let mut out = String::new();
        match format {
            OutputFormat::Table => self.write_table(&mut out, headers),
            OutputFormat::Plain | OutputFormat::Json => {
                for row in &self.rows {
                    let _ = writeln!(out, "{}\t{}", row.delete, row.cells.join("\t"));
                }
            }
        }
        let _ = writeln!(out, "{total_caption}{}", self.total);
        out
    }

    fn write_table(&self, out: &mut String, headers: &[&str]) {
        let lines: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.delete.to_string())
                    .chain(row.cells.iter().cloned())
                    .collect()
            })
            .collect();

        let columns = headers
            .len()
            .max(lines.iter().map(Vec::len).max().unwrap_or(0));
        let mut widths = vec![0; columns];
        for (i, header) in headers.iter().enumerate() {
            widths[i] = header.chars().count();
        }
        for line in &lines {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let header_line: Vec<String> = headers.iter().map(ToString::to_string).collect();
        write_padded(out, &header_line, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_padded(out, &rule, &widths);
        for line in &lines {
            write_padded(out, line, &widths);
        }
    }
}

fn write_padded(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}

impl TrackerView for BufferedView {
    fn render_rows(&mut self, rows: &[TableRow]) {
        self.rows = rows.to_vec();
    }

    fn render_total(&mut self, text: &str) {
        self.total = text.to_string();
    }

    fn show_error(&mut self, text: &str) {
        self.error = text.to_string();
    }

    fn show_result(&mut self, text: &str) {
        self.result = text.to_string();
    }

    fn clear_form(&mut self) {
        self.forms_cleared += 1;
    }
}
