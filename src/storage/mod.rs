//! Storage module for persisting addresses and checks
//!
//! This module handles all database operations, including:
//! - SQLite connection setup and schema management
//! - Allow-listed generic table access
//! - Address and check record repositories

mod address;
mod check;
mod database;
mod schema;
mod table;
mod traits;

pub use address::AddressRepository;
pub use check::CheckRepository;
pub use database::Database;
pub use schema::{TableSchema, ADDRESSES, CHECK_RECORDS};
pub use table::{Direction, OrderBy, Table};
pub use traits::{CheckStore, StorageError, StorageResult};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

/// On-disk timestamp format, second precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Represents a registered address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Represents one stored check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub id: i64,
    pub address_id: i64,
    /// `None` when the fetch failed before any HTTP response arrived
    pub status_code: Option<u16>,
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The caller-supplied fields of a check, before it is stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCheck {
    pub status_code: Option<u16>,
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// An address together with its most recent check, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSummary {
    pub id: i64,
    pub name: String,
    pub last_check_at: Option<DateTime<Utc>>,
    pub last_status_code: Option<u16>,
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(row: &Row<'_>, column: &str, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            let index = row.as_ref().column_index(column).unwrap_or_default();
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
        })
}

pub(crate) fn get_timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    parse_timestamp(row, column, &raw)
}

pub(crate) fn get_optional_timestamp(
    row: &Row<'_>,
    column: &str,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|raw| parse_timestamp(row, column, &raw)).transpose()
}
