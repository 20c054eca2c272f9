//! Database schema definitions
//!
//! This module contains the SQL schema and the column allow-lists the
//! generic table layer checks every field name against.

use crate::storage::traits::{StorageError, StorageResult};

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Registered addresses, one row per canonical scheme://host
CREATE TABLE IF NOT EXISTS addresses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK (length(name) <= 255),
    created_at TEXT NOT NULL
);

-- Point-in-time check results, append-only
CREATE TABLE IF NOT EXISTS check_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    address_id INTEGER NOT NULL REFERENCES addresses(id),
    status_code INTEGER,
    h1 TEXT,
    title TEXT,
    description TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_check_records_address
    ON check_records(address_id, created_at, id);
"#;

/// A table name together with the columns callers may reference
#[derive(Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl TableSchema {
    /// Rejects any column name outside the allow-list
    pub fn check_column(&self, column: &str) -> StorageResult<()> {
        if self.columns.contains(&column) {
            Ok(())
        } else {
            Err(StorageError::UnknownColumn {
                table: self.name,
                column: column.to_string(),
            })
        }
    }

    /// Comma-separated column list for SELECT statements
    pub fn select_list(&self) -> String {
        self.columns.join(", ")
    }
}

pub const ADDRESSES: TableSchema = TableSchema {
    name: "addresses",
    columns: &["id", "name", "created_at"],
};

pub const CHECK_RECORDS: TableSchema = TableSchema {
    name: "check_records",
    columns: &[
        "id",
        "address_id",
        "status_code",
        "h1",
        "title",
        "description",
        "created_at",
    ],
};

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
