//! typed_cursor library - typed, null-safe row access
//!
//! A [`cursor::TypedCursor`] walks rows from one of three backends (SQLite
//! query results, registered Rust records, JSON documents) and reads fields
//! by name through `get_*` (strict), `opt_*` (defaulting) and
//! `opt_*_as_option` accessors. Values are coerced by [`convert::Converter`];
//! booleans go through a pluggable [`boolean::BooleanPolicy`].
//!
//! [`query::QuerySpec`] describes a raw or structured query, round-trips
//! through JSON, and executes into a relational cursor.

pub mod boolean;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod cursor;
pub mod db;
pub mod field;
pub mod output;
pub mod query;
pub mod value;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
