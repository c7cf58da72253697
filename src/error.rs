use thiserror::Error;

/// Errors surfaced by the database seam.
///
/// Driver errors pass through transparently; the seam performs no error
/// translation or retry.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    PoolPostgres(#[from] deadpool::managed::PoolError<tokio_postgres::Error>),

    #[error(transparent)]
    PoolSqlite(#[from] deadpool::managed::PoolError<rusqlite::Error>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Parameter conversion error: {0}")]
    Parameter(String),

    #[error("SQL execution error: {0}")]
    Execution(String),
}

impl From<deadpool_sqlite::InteractError> for DbError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        DbError::Execution(format!("SQLite interact error: {err}"))
    }
}
