//! Backend-neutral persistence for projects and tasks.
//!
//! All SQL here uses bare `?` placeholders and the normalized result shape;
//! the only backend branch is the insert-id strategy (Postgres `RETURNING`
//! vs. SQLite `last_insert_rowid`).

mod projects;
mod tasks;

pub use tasks::{CreateTask, TaskFilter};

use chrono::NaiveDateTime;

use crate::pool::{Database, DbConnection};
use crate::types::SqlValue;
use crate::DbError;

/// Shared store over the process-lifetime database handle.
#[derive(Debug, Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub(crate) async fn conn(&self) -> Result<DbConnection, DbError> {
        self.db.pool.get_connection().await
    }

    /// Server-set timestamp for `created_at` / `updated_at`.
    pub(crate) fn now() -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}

pub(crate) fn opt_text(v: Option<&str>) -> SqlValue {
    v.map_or(SqlValue::Null, |s| SqlValue::Text(s.to_string()))
}

pub(crate) fn opt_float(v: Option<f64>) -> SqlValue {
    v.map_or(SqlValue::Null, SqlValue::Float)
}

pub(crate) fn opt_date(v: Option<chrono::NaiveDate>) -> SqlValue {
    v.map_or(SqlValue::Null, SqlValue::Date)
}
