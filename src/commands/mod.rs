//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `Execute` impl returning an `Outputable` result

mod documents;
mod run;
mod spec;

pub use documents::DocumentsCmd;
pub use run::RunCmd;
pub use spec::{SpecCmd, SpecKind, SpecResult};

use clap::Subcommand;
use rusqlite::Connection;
use std::error::Error;

use crate::convert::Converter;
use crate::cursor::{CursorError, RowSource, TypedCursor};
use crate::db::{DatabaseConfig, DbError};
use crate::output::{OutputFormat, Outputable, RowsResult};

/// Settings resolved once at startup and shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub database: DatabaseConfig,
    pub converter: Converter,
}

impl Context {
    pub fn connect(&self) -> Result<Connection, DbError> {
        self.database.connect()
    }
}

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a serialized query specification and print the rows
    Run(RunCmd),

    /// Build a query specification and print its serialized form
    Spec(SpecCmd),

    /// Read a JSON array of documents through a typed cursor
    Documents(DocumentsCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, ctx: &Context, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Run(cmd) => {
                let result = cmd.execute(ctx)?;
                Ok(result.format(format))
            }
            Command::Spec(cmd) => {
                let result = cmd.execute(ctx)?;
                Ok(result.format(format))
            }
            Command::Documents(cmd) => {
                let result = cmd.execute(ctx)?;
                Ok(result.format(format))
            }
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().cloned().unwrap_or_default()).into())
            }
        }
    }
}

/// Walk every row of `cursor`, reading `fields` (all columns when empty).
pub(crate) fn read_rows<S: RowSource>(
    cursor: &mut TypedCursor<S>,
    fields: &[String],
    source: Option<String>,
) -> Result<RowsResult, CursorError> {
    let columns = if fields.is_empty() { cursor.column_names() } else { fields.to_vec() };
    for column in &columns {
        cursor.column_index_or_err(column)?;
    }

    let mut result = RowsResult::new(source, columns);
    cursor.move_to_position(-1);
    while cursor.move_to_next() {
        let values = result
            .columns
            .iter()
            .map(|column| cursor.get_value(column))
            .collect::<Result<Vec<_>, _>>()?;
        result.push_row(values);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{document_cursor, sql_cursor};
    use crate::value::Value;
    use rstest::rstest;

    #[rstest]
    fn test_read_rows_all_columns() {
        let mut cursor = sql_cursor();
        let rows = read_rows(&mut cursor, &[], None).unwrap();
        assert_eq!(rows.columns, crate::test_utils::SAMPLE_COLUMNS);
        assert_eq!(rows.cells.len(), 3);
        assert_eq!(rows.cells[1][1], Value::Long(42));
    }

    #[rstest]
    fn test_read_rows_selected_fields() {
        let mut cursor = document_cursor();
        cursor.move_to_last();
        let fields = vec!["text".to_string(), "id".to_string()];
        let rows = read_rows(&mut cursor, &fields, Some("docs".to_string())).unwrap();
        assert_eq!(rows.columns, ["text", "id"]);
        assert_eq!(rows.cells[0], vec![Value::from("alpha"), Value::Int(1)]);
    }

    #[rstest]
    fn test_read_rows_unknown_field() {
        let mut cursor = sql_cursor();
        let fields = vec!["nope".to_string()];
        assert!(matches!(
            read_rows(&mut cursor, &fields, None),
            Err(CursorError::FieldNotFound { .. })
        ));
    }
}
