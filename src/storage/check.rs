//! Check record repository

use crate::storage::database::Database;
use crate::storage::schema::CHECK_RECORDS;
use crate::storage::table::{OrderBy, Table};
use crate::storage::traits::{CheckStore, StorageResult};
use crate::storage::{format_timestamp, get_timestamp, CheckRecord, NewCheck};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::Row;

/// Reads and writes the `check_records` table
///
/// Records are append-only: there is no update or delete.
#[derive(Debug, Clone)]
pub struct CheckRepository {
    table: Table,
}

impl CheckRepository {
    pub fn new(db: Database) -> Self {
        Self {
            table: Table::new(&CHECK_RECORDS, db),
        }
    }

    /// Stores a check stamped with the current time
    pub fn save(&self, address_id: i64, check: &NewCheck) -> StorageResult<i64> {
        self.save_at(address_id, check, Utc::now())
    }

    /// Stores a check with an explicit creation time
    pub fn save_at(
        &self,
        address_id: i64,
        check: &NewCheck,
        created_at: DateTime<Utc>,
    ) -> StorageResult<i64> {
        self.table.insert(&[
            ("address_id", Value::from(address_id)),
            ("status_code", Value::from(check.status_code)),
            ("h1", Value::from(check.h1.clone())),
            ("title", Value::from(check.title.clone())),
            ("description", Value::from(check.description.clone())),
            ("created_at", Value::from(format_timestamp(created_at))),
        ])
    }

    pub fn find_by_id(&self, id: i64) -> StorageResult<Option<CheckRecord>> {
        self.table.find_one_by("id", &id, None, map_check)
    }

    /// All checks of one address
    ///
    /// `order` defaults to `created_at DESC`. Equal timestamps fall back to
    /// the record id.
    pub fn find_all_by_address(
        &self,
        address_id: i64,
        order: Option<&OrderBy>,
    ) -> StorageResult<Vec<CheckRecord>> {
        let default_order = OrderBy::desc("created_at");
        let order = order.unwrap_or(&default_order);
        self.table
            .find_all_by("address_id", &address_id, Some(order), map_check)
    }

    /// The latest check of one address, if it was ever checked
    pub fn find_most_recent(&self, address_id: i64) -> StorageResult<Option<CheckRecord>> {
        self.table.find_one_by(
            "address_id",
            &address_id,
            Some(&OrderBy::desc("created_at")),
            map_check,
        )
    }
}

impl CheckStore for CheckRepository {
    fn save_check(&self, address_id: i64, check: &NewCheck) -> StorageResult<i64> {
        self.save(address_id, check)
    }
}

fn map_check(row: &Row<'_>) -> rusqlite::Result<CheckRecord> {
    Ok(CheckRecord {
        id: row.get("id")?,
        address_id: row.get("address_id")?,
        status_code: row.get("status_code")?,
        h1: row.get("h1")?,
        title: row.get("title")?,
        description: row.get("description")?,
        created_at: get_timestamp(row, "created_at")?,
    })
}
