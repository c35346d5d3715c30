//! Relational store
//!
//! One `SQLite` connection behind a mutex. Async callers go through
//! [`Database::run`], which moves the closure onto the blocking pool.

pub mod models;
pub mod repository;
pub mod schema;
pub mod seed;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{AppError, Result};
use crate::logger;

/// In-memory database path marker
pub const MEMORY_PATH: &str = ":memory:";

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == MEMORY_PATH {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open(path)?
        };
        schema::init_schema(&conn)?;
        logger::log_schema_ready(path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(MEMORY_PATH)
    }

    /// Run `f` with exclusive access to the connection on the current thread
    pub fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut conn)
    }

    /// Run `f` on the blocking pool with exclusive access to the connection
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.with_conn(f))
            .await
            .map_err(|e| AppError::Io(std::io::Error::other(e)))?
    }

    /// Cheap liveness probe used by the health endpoint
    pub async fn ping(&self) -> Result<()> {
        self.run(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
        .await
    }
}

/// Money column stored as decimal TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(pub Decimal);

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                Decimal::from_str(text)
                    .map(Amount)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Integer(i) => Ok(Self(Decimal::from(i))),
            ValueRef::Real(f) => Decimal::try_from(f)
                .map(Amount)
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory_and_ping() {
        let db = Database::open_in_memory().expect("open");
        assert!(db.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_open_file_creates_parent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data/lar.db");
        let db = Database::open(path.to_str().unwrap()).expect("open");
        assert!(db.ping().await.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_amount_column_reads_text_and_numbers() {
        let db = Database::open_in_memory().expect("open");
        db.with_conn(|conn| {
            let a: Amount = conn.query_row("SELECT '1234.56'", [], |r| r.get(0))?;
            let b: Amount = conn.query_row("SELECT 7", [], |r| r.get(0))?;
            assert_eq!(a.0, Decimal::new(123_456, 2));
            assert_eq!(b.0, Decimal::from(7));
            Ok(())
        })
        .unwrap();
    }

    #[tokio::test]
    async fn test_run_on_blocking_pool() {
        let db = Database::open_in_memory().expect("open");
        let n: i64 = db
            .run(|conn| Ok(conn.query_row("SELECT 40 + 2", [], |r| r.get(0))?))
            .await
            .unwrap();
        assert_eq!(n, 42);
    }
}
