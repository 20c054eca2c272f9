//! Address repository

use crate::storage::database::Database;
use crate::storage::schema::ADDRESSES;
use crate::storage::table::{OrderBy, Table};
use crate::storage::traits::{StorageError, StorageResult};
use crate::storage::{
    format_timestamp, get_optional_timestamp, get_timestamp, Address, AddressSummary,
};
use crate::url::CanonicalUrl;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{ErrorCode, Row};

/// Reads and writes the `addresses` table
#[derive(Debug, Clone)]
pub struct AddressRepository {
    table: Table,
}

impl AddressRepository {
    pub fn new(db: Database) -> Self {
        Self {
            table: Table::new(&ADDRESSES, db),
        }
    }

    /// Stores a new address stamped with the current time
    pub fn insert(&self, name: &CanonicalUrl) -> StorageResult<i64> {
        self.insert_at(name, Utc::now())
    }

    /// Stores a new address with an explicit creation time
    pub fn insert_at(&self, name: &CanonicalUrl, created_at: DateTime<Utc>) -> StorageResult<i64> {
        let id = self.table.insert(&[
            ("name", Value::from(name.as_str().to_string())),
            ("created_at", Value::from(format_timestamp(created_at))),
        ])?;
        tracing::info!("Registered address {} as #{}", name, id);
        Ok(id)
    }

    pub fn find_by_id(&self, id: i64) -> StorageResult<Option<Address>> {
        self.table.find_one_by("id", &id, None, map_address)
    }

    /// Looks an address up by its canonical name
    pub fn find_by_name(&self, name: &str) -> StorageResult<Option<Address>> {
        self.table.find_one_by("name", &name, None, map_address)
    }

    /// All addresses, newest first
    pub fn find_all(&self) -> StorageResult<Vec<Address>> {
        self.table.find_all(&OrderBy::desc("id"), map_address)
    }

    /// Returns the stored address for `name`, inserting it if needed
    ///
    /// The flag is `true` when this call created the row.
    pub fn find_or_create(&self, name: &CanonicalUrl) -> StorageResult<(Address, bool)> {
        if let Some(existing) = self.find_by_name(name.as_str())? {
            return Ok((existing, false));
        }

        match self.insert(name) {
            Ok(id) => {
                let address = self
                    .find_by_id(id)?
                    .ok_or(StorageError::AddressNotFound(id))?;
                Ok((address, true))
            }
            // Lost a race with a concurrent insert of the same name
            Err(StorageError::Sqlite(rusqlite::Error::SqliteFailure(e, _)))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                let address = self.find_by_name(name.as_str())?.ok_or_else(|| {
                    StorageError::Sqlite(rusqlite::Error::SqliteFailure(e, None))
                })?;
                Ok((address, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Every address with the date and status of its most recent check
    ///
    /// Ordered by address id, newest first. Addresses never checked carry
    /// `None` in both check fields.
    pub fn list_with_last_check(&self) -> StorageResult<Vec<AddressSummary>> {
        const SQL: &str = "
            SELECT a.id, a.name, c.created_at AS last_check_at, c.status_code AS last_status_code
            FROM addresses a
            LEFT JOIN check_records c ON c.id = (
                SELECT id FROM check_records
                WHERE address_id = a.id
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            )
            ORDER BY a.id DESC
        ";

        self.table.database().with_connection(|conn| {
            let mut stmt = conn.prepare(SQL)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(AddressSummary {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        last_check_at: get_optional_timestamp(row, "last_check_at")?,
                        last_status_code: row.get("last_status_code")?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn map_address(row: &Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: get_timestamp(row, "created_at")?,
    })
}
