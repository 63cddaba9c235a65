//! Database connection management.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use super::DbError;

/// Open (or create) a SQLite database file.
pub fn open_db(path: &Path) -> Result<Connection, DbError> {
    debug!(path = %path.display(), "opening sqlite database");
    Connection::open(path).map_err(|e| DbError::OpenFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Open a private in-memory database.
pub fn open_mem_db() -> Result<Connection, DbError> {
    Connection::open_in_memory().map_err(|e| DbError::OpenFailed {
        path: ":memory:".to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_open_db_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.sqlite");

        let conn = open_db(&path).unwrap();
        conn.execute_batch("CREATE TABLE t (a INTEGER)").unwrap();
        assert!(path.exists());
    }

    #[rstest]
    fn test_open_db_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/rows.sqlite");

        let err = open_db(&path).unwrap_err();
        assert!(matches!(err, DbError::OpenFailed { .. }));
        assert!(err.to_string().contains("rows.sqlite"));
    }

    #[rstest]
    fn test_mem_db_is_private() {
        let first = open_mem_db().unwrap();
        let second = open_mem_db().unwrap();
        first.execute_batch("CREATE TABLE t (a INTEGER)").unwrap();
        assert!(second.prepare("SELECT * FROM t").is_err());
    }
}
