use crate::error::DbError;
use crate::pool::{DbConnection, QueryExecutor};

/// SQLite dialect: rowid primary keys, tags serialized as JSON text,
/// timestamps and dates stored as text.
const SQLITE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'todo',
    priority TEXT NOT NULL DEFAULT 'medium',
    due_date TEXT,
    estimated_hours REAL,
    actual_hours REAL,
    tags TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
";

/// Postgres dialect: generated bigint keys, native JSONB tags, real
/// timestamp/date columns.
const POSTGRES_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id BIGSERIAL PRIMARY KEY,
    project_id BIGINT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'todo',
    priority TEXT NOT NULL DEFAULT 'medium',
    due_date DATE,
    estimated_hours DOUBLE PRECISION,
    actual_hours DOUBLE PRECISION,
    tags JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
";

/// Apply the idempotent DDL for the connection's backend. Run once at
/// startup before the server accepts requests.
///
/// # Errors
///
/// Propagates driver errors from the DDL batch.
pub async fn ensure_schema(conn: &mut DbConnection) -> Result<(), DbError> {
    let ddl = match conn {
        DbConnection::Postgres(_) => POSTGRES_SCHEMA,
        DbConnection::Sqlite(_) => SQLITE_SCHEMA,
    };
    conn.execute_batch(ddl).await
}
