use rusqlite::Connection;
use std::cell::RefCell;

use crate::errors::{AppError, AppResult};

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot, tagged with the path it was opened for.
thread_local! {
    static DB_CONN: RefCell<Option<(String, Connection)>> = RefCell::new(None);
}

#[derive(Debug, Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Provides this thread's connection to the closure, opening it on first use
    /// or when the thread last talked to a different database file.
    ///
    /// Must not be nested: the slot is borrowed for the whole call.
    pub fn with_conn<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();

                let stale = slot.as_ref().map_or(true, |(path, _)| path != &self.path);
                if stale {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| AppError::DbError(format!("Open DB failed: {e}")))?;
                    *slot = Some((self.path.clone(), conn));
                }

                match slot.as_mut() {
                    Some((_, conn)) => f(conn),
                    None => Err(AppError::DbError("Connection slot is empty".into())),
                }
            })
            .map_err(|_| AppError::DbError("Thread-local connection unavailable".into()))?;
        inner_result
    }
}

/// Creates the tables this crate writes to. Safe to run on every start.
pub fn init_db(db: &Database) -> AppResult<()> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| AppError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    tracing::debug!(path = %db.path(), "database schema ready");
    Ok(())
}
