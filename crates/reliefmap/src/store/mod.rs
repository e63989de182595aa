//! SQLite-backed implementation of every repository trait.
//!
//! One connection sits behind a mutex; each trait call holds it for a single statement or a
//! single transaction, so SQLite serializes writers for us. Every call blocks, so HTTP handlers
//! reach the store through `http::blocking`.

mod amenities;
mod locations;
mod reviews;
mod schema;
mod users;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::repository::RepositoryError;

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened sqlite store");
        Self::initialize(conn)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        if config.is_in_memory() {
            Self::open_in_memory()
        } else {
            Self::open(&config.path)
        }
    }

    fn initialize(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs raw SQL against the store. Intended for maintenance scripts and fixtures.
    pub fn execute_batch(&self, sql: &str) -> Result<(), RepositoryError> {
        self.with_conn(|conn| Ok(conn.execute_batch(sql)?))
    }

    /// Counts every row of a known table, soft-deleted ones included.
    pub fn row_count(&self, table: &str) -> Result<i64, RepositoryError> {
        if !schema::TABLES.contains(&table) {
            return Err(RepositoryError::Unavailable(format!(
                "unknown table '{table}'"
            )));
        }
        self.with_conn(|conn| {
            let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
            Ok(count)
        })
    }

    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection mutex poisoned".to_string()))?;
        f(&mut *guard)
    }
}

pub(crate) fn bool_to_sql(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn sql_to_bool(value: i64) -> bool {
    value != 0
}

/// Escapes `%`, `_`, and the escape character itself for a `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
