//! Generic data access over one table
//!
//! [`Table`] builds every statement from a [`TableSchema`] and refuses any
//! column name that is not in its allow-list, so field and ordering names
//! that originate from callers can never become query structure. Entity
//! repositories wrap a `Table` rather than reimplementing SQL.

use crate::storage::database::Database;
use crate::storage::schema::TableSchema;
use crate::storage::traits::{StorageError, StorageResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row, ToSql};
use std::fmt;
use std::str::FromStr;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// An ORDER BY request: one column and a direction
///
/// Ties are always broken by `id` in the same direction, so rows created
/// within the same second still come back in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Renders the clause after checking the column against `schema`
    fn to_sql(&self, schema: &TableSchema) -> StorageResult<String> {
        schema.check_column(&self.column)?;
        let dir = self.direction.as_sql();
        if self.column == "id" {
            Ok(format!("ORDER BY id {}", dir))
        } else {
            Ok(format!("ORDER BY {} {}, id {}", self.column, dir, dir))
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction.as_sql())
    }
}

/// Parses `"<column>"`, `"<column> ASC"` or `"<column> DESC"`
///
/// Only the shape is checked here; the column itself is checked against
/// the table's allow-list when the ordering is used.
impl FromStr for OrderBy {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let column = parts
            .next()
            .ok_or_else(|| StorageError::InvalidOrder(s.to_string()))?;
        let direction = match parts.next() {
            None => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(_) => return Err(StorageError::InvalidOrder(s.to_string())),
        };
        if parts.next().is_some() {
            return Err(StorageError::InvalidOrder(s.to_string()));
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

/// Allow-listed access to a single table
#[derive(Debug, Clone)]
pub struct Table {
    schema: &'static TableSchema,
    db: Database,
}

impl Table {
    pub fn new(schema: &'static TableSchema, db: Database) -> Self {
        Self { schema, db }
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Inserts a row and returns its id
    ///
    /// Every field name is checked before anything is written. Fields whose
    /// value is `NULL` are left out of the statement; the column default
    /// (`NULL` for every nullable column) applies instead.
    ///
    /// # Arguments
    ///
    /// * `fields` - Column names paired with their values
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - Id of the new row
    /// * `Err(StorageError::UnknownColumn)` - A name outside the allow-list; nothing was written
    pub fn insert(&self, fields: &[(&str, Value)]) -> StorageResult<i64> {
        for (column, _) in fields {
            self.schema.check_column(column)?;
        }

        let present: Vec<&(&str, Value)> = fields
            .iter()
            .filter(|(_, value)| *value != Value::Null)
            .collect();

        let sql = if present.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.schema.name)
        } else {
            let columns: Vec<&str> = present.iter().map(|(column, _)| *column).collect();
            let placeholders: Vec<String> =
                (1..=present.len()).map(|i| format!("?{}", i)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.schema.name,
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        self.db.with_connection(|conn| {
            conn.execute(&sql, params_from_iter(present.iter().map(|(_, value)| value)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Finds the first row where `column = value`
    pub fn find_one_by<T, F>(
        &self,
        column: &str,
        value: &dyn ToSql,
        order: Option<&OrderBy>,
        map: F,
    ) -> StorageResult<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let sql = format!("{} LIMIT 1", self.select_where(column, order)?);
        self.db.with_connection(|conn| {
            let row = conn.query_row(&sql, [value], map).optional()?;
            Ok(row)
        })
    }

    /// Finds every row where `column = value`
    pub fn find_all_by<T, F>(
        &self,
        column: &str,
        value: &dyn ToSql,
        order: Option<&OrderBy>,
        map: F,
    ) -> StorageResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let sql = self.select_where(column, order)?;
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([value], map)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns every row in the table
    pub fn find_all<T, F>(&self, order: &OrderBy, map: F) -> StorageResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let sql = format!(
            "SELECT {} FROM {} {}",
            self.schema.select_list(),
            self.schema.name,
            order.to_sql(self.schema)?
        );
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Counts all rows
    pub fn count(&self) -> StorageResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.schema.name);
        self.db.with_connection(|conn| {
            let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }

    fn select_where(&self, column: &str, order: Option<&OrderBy>) -> StorageResult<String> {
        self.schema.check_column(column)?;
        let mut sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            self.schema.select_list(),
            self.schema.name,
            column
        );
        if let Some(order) = order {
            sql.push(' ');
            sql.push_str(&order.to_sql(self.schema)?);
        }
        Ok(sql)
    }
}
