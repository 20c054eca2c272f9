//! Shared SQLite connection handle

use crate::config::DatabaseLocation;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageError, StorageResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Cloneable handle to one SQLite connection
///
/// Constructed once at startup and passed to every repository. Access is
/// serialized through a mutex, so an insert and its `last_insert_rowid`
/// always observe the same statement.
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens the database described by a parsed `DATABASE_URL`
    pub fn open(location: &DatabaseLocation) -> StorageResult<Self> {
        match location {
            DatabaseLocation::File(path) => Self::open_path(path),
            DatabaseLocation::Memory => Self::open_in_memory(),
        }
    }

    /// Opens or creates a database file and applies the schema
    pub fn open_path(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;
        tracing::debug!("Opened database at {}", path.display());

        Ok(Self::from_connection(conn))
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with exclusive access to the connection
    pub fn with_connection<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T>,
    {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(&conn)
    }
}
