use async_trait::async_trait;
use deadpool_postgres::{Object as PostgresObject, Pool as PostgresPool};
use deadpool_sqlite::{Object as SqliteObject, Pool as SqlitePool};

use crate::config::AppConfig;
use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::{DatabaseType, SqlValue};
use crate::{postgres, sqlite};

/// Connection pool for database access.
///
/// Wraps the two supported pool types so the rest of the crate holds a single
/// handle regardless of backend.
#[derive(Debug, Clone)]
pub enum DbPool {
    /// `PostgreSQL` connection pool
    Postgres(PostgresPool),
    /// `SQLite` connection pool
    Sqlite(SqlitePool),
}

/// The process-lifetime database handle: pool plus backend tag.
///
/// Built exactly once at startup by [`Database::connect`]; configuration is
/// never re-read per call.
#[derive(Debug, Clone)]
pub struct Database {
    /// The connection pool
    pub pool: DbPool,
    /// The database type
    pub db_type: DatabaseType,
}

impl Database {
    /// Construct the backend selected by configuration.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Config` for invalid settings and
    /// `DbError::Connection` when the pool cannot be created.
    pub async fn connect(config: &AppConfig) -> Result<Self, DbError> {
        match config.backend {
            DatabaseType::Sqlite => Self::new_sqlite(&config.sqlite_path).await,
            DatabaseType::Postgres => Self::new_postgres(config.pg_config()).await,
        }
    }
}

impl DbPool {
    /// Check out a connection from the pool.
    ///
    /// # Errors
    ///
    /// Propagates the pool's checkout error for the active backend.
    pub async fn get_connection(&self) -> Result<DbConnection, DbError> {
        match self {
            DbPool::Postgres(pool) => {
                let conn: PostgresObject = pool.get().await.map_err(DbError::PoolPostgres)?;
                Ok(DbConnection::Postgres(conn))
            }
            DbPool::Sqlite(pool) => {
                let conn: SqliteObject = pool.get().await.map_err(DbError::PoolSqlite)?;
                Ok(DbConnection::Sqlite(conn))
            }
        }
    }
}

/// A checked-out connection for one of the two backends.
#[derive(Debug)]
pub enum DbConnection {
    Postgres(PostgresObject),
    Sqlite(SqliteObject),
}

/// The backend-neutral query surface.
///
/// Callers write SQL with bare `?` placeholders in source order; each adapter
/// maps that onto its native call convention and normalizes the result into a
/// [`ResultSet`].
#[async_trait]
pub trait QueryExecutor {
    /// Execute a batch of statements (DDL, pragmas) inside one transaction.
    /// No parameters are supported.
    async fn execute_batch(&mut self, sql: &str) -> Result<(), DbError>;

    /// Execute a single SELECT (or INSERT/UPDATE/DELETE with `RETURNING`)
    /// and return the rows.
    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ResultSet, DbError>;

    /// Execute a single DML statement. The returned set has no rows;
    /// `rows_affected` is the match count and `last_insert_id` is populated
    /// by the SQLite adapter after an INSERT.
    async fn execute_dml(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, DbError>;
}

#[async_trait]
impl QueryExecutor for DbConnection {
    async fn execute_batch(&mut self, sql: &str) -> Result<(), DbError> {
        match self {
            DbConnection::Postgres(pg_client) => postgres::execute_batch(pg_client, sql).await,
            DbConnection::Sqlite(sqlite_client) => sqlite::execute_batch(sqlite_client, sql).await,
        }
    }

    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ResultSet, DbError> {
        tracing::debug!(sql, params = params.len(), "execute_select");
        match self {
            DbConnection::Postgres(pg_client) => {
                postgres::execute_select(pg_client, sql, params).await
            }
            DbConnection::Sqlite(sqlite_client) => {
                sqlite::execute_select(sqlite_client, sql, params).await
            }
        }
    }

    async fn execute_dml(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, DbError> {
        tracing::debug!(sql, params = params.len(), "execute_dml");
        match self {
            DbConnection::Postgres(pg_client) => {
                postgres::execute_dml(pg_client, sql, params).await
            }
            DbConnection::Sqlite(sqlite_client) => {
                sqlite::execute_dml(sqlite_client, sql, params).await
            }
        }
    }
}
