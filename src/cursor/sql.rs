//! Relational backend: the materialized result of a SQLite query.

use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use super::{CursorError, RowSource};
use crate::value::Value;

/// Rows and column names of a query result.
#[derive(Debug, Clone, Default)]
pub struct SqlRows {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl SqlRows {
    /// Run `sql` with positional `?` parameters bound as text.
    pub fn query(conn: &Connection, sql: &str, args: &[String]) -> Result<Self, rusqlite::Error> {
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map(params_from_iter(args.iter()), |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(Value::from))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = rows.len(), columns = width, "materialized query result");
        Ok(Self { columns, rows })
    }

    /// Build a result set directly, e.g. for tests or precomputed data.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl RowSource for SqlRows {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn field_name(&self, field: usize) -> Option<&str> {
        self.columns.get(field).map(String::as_str)
    }

    /// Case-insensitive, first match wins. A qualified name such as
    /// `t1.name` matches on the part after the last dot.
    fn field_index(&self, name: &str) -> Option<usize> {
        let bare = name.rsplit('.').next().unwrap_or(name);
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(bare))
    }

    fn value(&self, row: usize, field: usize) -> Result<Value, CursorError> {
        Ok(self
            .rows
            .get(row)
            .and_then(|r| r.get(field))
            .cloned()
            .unwrap_or(Value::Null))
    }
}
