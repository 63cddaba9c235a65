//! Database configuration for runtime backend selection.

use std::path::PathBuf;

use rusqlite::Connection;

use super::connection::{open_db, open_mem_db};
use super::DbError;

/// Default database file when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "./typed_cursor.sqlite";

/// Which SQLite database to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// A database file on disk.
    Sqlite { path: PathBuf },

    /// A private in-memory database.
    Memory,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl DatabaseConfig {
    /// Open a connection for this configuration.
    pub fn connect(&self) -> Result<Connection, DbError> {
        match self {
            Self::Sqlite { path } => open_db(path),
            Self::Memory => open_mem_db(),
        }
    }

    /// Parse from a connection URL or file path.
    ///
    /// Supported formats:
    /// - `:memory:` → Memory
    /// - `sqlite://path/to/db` or `sqlite:path/to/db` → Sqlite
    /// - `./path/to/db.sqlite` or `/absolute/path` → Sqlite
    ///
    /// Any other `scheme://` URL is rejected.
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        if url == ":memory:" || url == "sqlite::memory:" {
            return Ok(Self::Memory);
        }

        if let Some(path) = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:")) {
            return Ok(Self::Sqlite {
                path: PathBuf::from(path),
            });
        }

        if url.contains("://") {
            return Err(DbError::UnsupportedUrl { url: url.to_string() });
        }

        Ok(Self::Sqlite {
            path: PathBuf::from(url),
        })
    }

    /// Read `DATABASE_URL`, if set.
    pub fn from_env() -> Result<Option<Self>, DbError> {
        match std::env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Self::from_url(&url).map(Some),
            _ => Ok(None),
        }
    }
}
