//! Task-tracking backend with two interchangeable relational stores.
//!
//! The core is the database seam: a connection factory that picks SQLite or
//! Postgres once at startup ([`pool::Database`]) and per-backend query
//! adapters that accept one placeholder style (bare `?`) and return one
//! normalized result shape ([`results::ResultSet`]). Route handlers in
//! [`http`] run unmodified against either backend.

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod pool;
pub mod postgres;
pub mod results;
pub mod schema;
pub mod sqlite;
pub mod store;
pub mod translation;
pub mod types;

pub use config::AppConfig;
pub use error::DbError;
pub use pool::{Database, DbConnection, DbPool, QueryExecutor};
pub use results::{DbRow, ResultSet};
pub use store::Store;
pub use types::{DatabaseType, SqlValue};
