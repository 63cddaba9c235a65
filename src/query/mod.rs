//! Serializable query specifications.
//!
//! A [`QuerySpec`] describes either a raw SQL string with positional
//! parameters ([`RawQuery`]) or a structured select ([`SelectQuery`]), plus
//! shared metadata (tag, comment, version). Specifications are built once
//! through [`RawQueryBuilder`] or [`SelectQueryBuilder`], can be written to
//! and read from JSON ([`QuerySpec::to_text`], [`QuerySpec::from_text`]), and
//! execute against a SQLite connection owned by the caller.
//!
//! # Example
//!
//! ```
//! use typed_cursor::query::{QuerySpec, SelectQueryBuilder};
//!
//! let spec = SelectQueryBuilder::new("t1 LEFT OUTER JOIN t2 ON t1.id = t2.id")
//!     .distinct(true)
//!     .limit("10")
//!     .tag("recent")
//!     .build();
//!
//! let text = spec.to_text().unwrap();
//! assert_eq!(QuerySpec::from_text(&text).unwrap(), spec);
//! ```

mod builder;
pub mod sql;
mod wire;

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

use crate::cursor::{SqlCursor, SqlRows, TypedCursor};

pub use builder::{RawQueryBuilder, SelectQueryBuilder};

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid query specification: {0}")]
    InvalidSpecification(String),

    #[error("Invalid SQL: {0}")]
    InvalidSql(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which variant a specification holds, with its stored tag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Uninitialised = 0,
    Select = 1,
    Raw = 2,
}

impl QueryType {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(QueryType::Uninitialised),
            1 => Some(QueryType::Select),
            2 => Some(QueryType::Raw),
            _ => None,
        }
    }
}

/// A raw SQL string with positional `?` parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawQuery {
    pub(crate) sql: String,
    pub(crate) selection_args: Option<Vec<String>>,
}

impl RawQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn selection_args(&self) -> Option<&[String]> {
        self.selection_args.as_deref()
    }
}

/// A structured select over one or more tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub(crate) distinct: bool,
    pub(crate) tables: String,
    pub(crate) columns: Option<Vec<String>>,
    pub(crate) selection: Option<String>,
    pub(crate) selection_args: Option<Vec<String>>,
    pub(crate) group_by: Option<String>,
    pub(crate) having: Option<String>,
    pub(crate) sort_order: Option<String>,
    pub(crate) limit: Option<String>,
    pub(crate) strict: bool,
}

impl SelectQuery {
    pub fn distinct(&self) -> bool {
        self.distinct
    }

    pub fn tables(&self) -> &str {
        &self.tables
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn selection_args(&self) -> Option<&[String]> {
        self.selection_args.as_deref()
    }

    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    pub fn having(&self) -> Option<&str> {
        self.having.as_deref()
    }

    pub fn sort_order(&self) -> Option<&str> {
        self.sort_order.as_deref()
    }

    pub fn limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }

    pub fn strict(&self) -> bool {
        self.strict
    }
}

/// The populated variant of a specification.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryKind {
    #[default]
    Uninitialised,
    Select(SelectQuery),
    Raw(RawQuery),
}

impl QueryKind {
    pub fn query_type(&self) -> QueryType {
        match self {
            QueryKind::Uninitialised => QueryType::Uninitialised,
            QueryKind::Select(_) => QueryType::Select,
            QueryKind::Raw(_) => QueryType::Raw,
        }
    }
}

/// An immutable, serializable description of a query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySpec {
    pub(crate) kind: QueryKind,
    pub(crate) tag: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) version: i32,
}

impl QuerySpec {
    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    pub fn query_type(&self) -> QueryType {
        self.kind.query_type()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// SQL text and bound arguments this specification runs.
    pub fn compile(&self) -> Result<(String, Vec<String>), QueryError> {
        match &self.kind {
            QueryKind::Uninitialised => Err(uninitialised("execute")),
            QueryKind::Raw(raw) if raw.sql.trim().is_empty() => Err(
                QueryError::InvalidSpecification("a raw query needs SQL text".to_string()),
            ),
            QueryKind::Raw(raw) => Ok((
                raw.sql.clone(),
                raw.selection_args.clone().unwrap_or_default(),
            )),
            QueryKind::Select(select) => Ok((
                sql::compile_select(select)?,
                select.selection_args.clone().unwrap_or_default(),
            )),
        }
    }

    /// Run the query on `conn` and return a cursor positioned on the first
    /// row (or before it, when the result is empty).
    pub fn execute(&self, conn: &Connection) -> Result<SqlCursor, QueryError> {
        if let QueryKind::Select(select) = &self.kind {
            if select.strict {
                sql::validate_selection(conn, select)?;
            }
        }
        let (sql, args) = self.compile()?;
        debug!(tag = ?self.tag, sql = %sql, args = args.len(), "executing query");

        let rows = SqlRows::query(conn, &sql, &args)?;
        let mut cursor = TypedCursor::new(rows);
        cursor.move_to_first();
        Ok(cursor)
    }

    /// Serialize to the JSON wire format.
    pub fn to_text(&self) -> Result<String, QueryError> {
        let wire = wire::WireSpec::try_from(self)?;
        Ok(serde_json::to_string(&wire)?)
    }

    /// Parse the JSON wire format.
    pub fn from_text(text: &str) -> Result<Self, QueryError> {
        let wire: wire::WireSpec = serde_json::from_str(text)?;
        Self::try_from(wire)
    }
}

fn uninitialised(action: &str) -> QueryError {
    QueryError::InvalidSpecification(format!("cannot {} an uninitialised query", action))
}
