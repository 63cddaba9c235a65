//! Output formatting for command results.
//!
//! Supports multiple output formats: table (human-readable), JSON, and toon.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::value::Value;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Token-efficient toon format
    Toon,
}

/// Trait for types that can be formatted for output
pub trait Outputable: Serialize {
    /// Format as a human-readable table
    fn to_table(&self) -> String;

    /// Format according to the specified output format
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.to_table(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Toon => {
                let json_value = serde_json::to_value(self).unwrap_or_default();
                toon::encode(&json_value, None)
            }
        }
    }
}

/// Rows read through a cursor, shared by every command that prints rows.
#[derive(Debug, Default, Serialize)]
pub struct RowsResult {
    /// Where the rows came from (a spec tag, file name, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub columns: Vec<String>,
    /// Cell values as displayed in table output.
    #[serde(skip)]
    pub cells: Vec<Vec<Value>>,
    pub rows: Vec<Map<String, Json>>,
}

impl RowsResult {
    pub fn new(source: Option<String>, columns: Vec<String>) -> Self {
        Self {
            source,
            columns,
            ..Self::default()
        }
    }

    pub fn push_row(&mut self, values: Vec<Value>) {
        let row = self
            .columns
            .iter()
            .zip(&values)
            .map(|(column, value)| (column.clone(), Json::from(value)))
            .collect();
        self.rows.push(row);
        self.cells.push(values);
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn display_cell(value: &Value) -> String {
    if value.is_null() { "NULL".to_string() } else { value.to_string() }
}

impl Outputable for RowsResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        if let Some(source) = &self.source {
            lines.push(format!("Rows from {}:", source));
            lines.push(String::new());
        }

        if self.cells.is_empty() {
            lines.push("No rows.".to_string());
            return lines.join("\n");
        }

        let rendered: Vec<Vec<String>> = self
            .cells
            .iter()
            .map(|row| row.iter().map(display_cell).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rendered
                    .iter()
                    .filter_map(|row| row.get(i).map(|cell| cell.chars().count()))
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        lines.push(render_line(&self.columns, &widths));
        lines.push(render_line(&separator, &widths));
        for row in &rendered {
            lines.push(render_line(row, &widths));
        }
        lines.push(String::new());
        lines.push(format!("{} row(s)", rendered.len()));

        lines.join("\n")
    }
}
