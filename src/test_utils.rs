//! Shared test fixtures.
//!
//! Every backend is loaded with the same three rows so the accessor contract
//! can be checked uniformly:
//!
//! | id | int         | long       | double | text    | flag  |
//! |----|-------------|------------|--------|---------|-------|
//! | 1  | i32::MIN    | i64::MAX   | 1.5    | "alpha" | true  |
//! | 2  | 42          | -7         | -0.25  | "17"    | false |
//! | 3  | null        | null       | null   | null    | null  |
//!
//! The SQL table stores `flag` as 1/0 and carries an extra `blob` column.

use rusqlite::Connection;
use serde_json::json;

use crate::cursor::{DocumentCursor, DocumentRows, ObjectCursor, ObjectRows, SqlCursor, SqlRows, TypedCursor};

pub const SAMPLE_COLUMNS: [&str; 6] = ["id", "int", "long", "double", "text", "flag"];

/// In-memory database holding the sample `data` table.
pub fn sample_connection() -> Connection {
    let conn = crate::db::open_mem_db().expect("Failed to open in-memory SQLite");
    conn.execute_batch(
        r#"
        CREATE TABLE data (
            "id" INTEGER PRIMARY KEY,
            "int" INTEGER,
            "long" INTEGER,
            "double" REAL,
            "text" TEXT,
            "flag" INTEGER,
            "blob" BLOB
        );
        INSERT INTO data VALUES (1, -2147483648, 9223372036854775807, 1.5, 'alpha', 1, x'00000000000000ff');
        INSERT INTO data VALUES (2, 42, -7, -0.25, '17', 0, x'cafe');
        INSERT INTO data VALUES (3, NULL, NULL, NULL, NULL, NULL, NULL);
        "#,
    )
    .expect("Failed to create sample table");
    conn
}

pub fn sql_cursor() -> SqlCursor {
    let conn = sample_connection();
    let rows = SqlRows::query(
        &conn,
        r#"SELECT "id", "int", "long", "double", "text", "flag" FROM data ORDER BY "id""#,
        &[],
    )
    .expect("Sample query should succeed");
    TypedCursor::new(rows)
}

/// Record type mirroring the sample table.
#[derive(Debug, Clone)]
pub struct Sample {
    pub id: i64,
    pub int: Option<i32>,
    pub long: Option<i64>,
    pub double: Option<f64>,
    pub text: Option<String>,
    pub flag: Option<bool>,
}

impl Sample {
    pub fn get_id(&self) -> i64 {
        self.id
    }

    pub fn get_int(&self) -> Option<i32> {
        self.int
    }

    pub fn get_long(&self) -> Option<i64> {
        self.long
    }

    pub fn get_double(&self) -> Option<f64> {
        self.double
    }

    pub fn get_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_flag(&self) -> Option<bool> {
        self.flag
    }
}

crate::record_fields!(Sample {
    get_id,
    get_int,
    get_long,
    get_double,
    get_text,
    is_flag,
});

pub fn sample_records() -> Vec<Sample> {
    vec![
        Sample {
            id: 1,
            int: Some(i32::MIN),
            long: Some(i64::MAX),
            double: Some(1.5),
            text: Some("alpha".to_string()),
            flag: Some(true),
        },
        Sample {
            id: 2,
            int: Some(42),
            long: Some(-7),
            double: Some(-0.25),
            text: Some("17".to_string()),
            flag: Some(false),
        },
        Sample {
            id: 3,
            int: None,
            long: None,
            double: None,
            text: None,
            flag: None,
        },
    ]
}

pub fn object_cursor() -> ObjectCursor<Sample> {
    TypedCursor::new(ObjectRows::new(sample_records()))
}

pub fn sample_documents() -> serde_json::Value {
    json!([
        {"id": 1, "int": i32::MIN, "long": i64::MAX, "double": 1.5, "text": "alpha", "flag": true},
        {"id": 2, "int": 42, "long": -7, "double": -0.25, "text": "17", "flag": false, "extra": "unreachable"},
        {"id": 3, "int": null, "long": null, "double": null, "text": null, "flag": null}
    ])
}

pub fn document_cursor() -> DocumentCursor {
    let rows = DocumentRows::from_json(sample_documents()).expect("Sample documents are objects");
    TypedCursor::new(rows)
}
