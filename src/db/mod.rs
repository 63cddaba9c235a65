//! SQLite connection management.
//!
//! The caller owns the [`rusqlite::Connection`]; query specifications and
//! relational cursors borrow it for the duration of a query. Backend selection
//! (file or in-memory) comes from [`DatabaseConfig`].

mod config;
mod connection;

pub use config::DatabaseConfig;
pub use connection::{open_db, open_mem_db};

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to open database '{path}': {message}")]
    OpenFailed { path: String, message: String },

    #[error("Unsupported database URL '{url}'")]
    UnsupportedUrl { url: String },
}
