use deadpool_sqlite::{Config as SqliteConfig, Object, Runtime};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Statement, ToSql};

use crate::error::DbError;
use crate::pool::{Database, DbPool};
use crate::results::ResultSet;
use crate::types::{DatabaseType, SqlValue};

impl Database {
    /// Build the SQLite-backed handle: a deadpool over one database file,
    /// with WAL enabled at init.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connection` if the pool cannot be created and
    /// propagates pool/driver errors from the init pragma.
    pub async fn new_sqlite(db_path: &str) -> Result<Self, DbError> {
        let cfg = SqliteConfig::new(db_path);

        let pool = cfg.create_pool(Runtime::Tokio1).map_err(|e| {
            DbError::Connection(format!("Failed to create SQLite pool: {e}"))
        })?;

        {
            let conn = pool.get().await.map_err(DbError::PoolSqlite)?;
            conn.interact(|conn| {
                conn.execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(DbError::Sqlite)
            })
            .await??;
        }

        Ok(Database {
            pool: DbPool::Sqlite(pool),
            db_type: DatabaseType::Sqlite,
        })
    }
}

/// Bind unified values to SQLite types. Dates, timestamps and JSON are
/// stored as text since SQLite has no native column types for them.
pub fn convert_params(params: &[SqlValue]) -> Vec<Value> {
    let mut values = Vec::with_capacity(params.len());
    for p in params {
        let v = match p {
            SqlValue::Int(i) => Value::Integer(*i),
            SqlValue::Float(f) => Value::Real(*f),
            SqlValue::Text(s) => Value::Text(s.clone()),
            SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
            SqlValue::Timestamp(dt) => Value::Text(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            SqlValue::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
            SqlValue::Null => Value::Null,
            SqlValue::Json(jsval) => Value::Text(jsval.to_string()),
        };
        values.push(v);
    }
    values
}

fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, DbError> {
    match row.get_ref(idx) {
        Err(e) => Err(DbError::Sqlite(e)),
        Ok(ValueRef::Null) => Ok(SqlValue::Null),
        Ok(ValueRef::Integer(i)) => Ok(SqlValue::Int(i)),
        Ok(ValueRef::Real(f)) => Ok(SqlValue::Float(f)),
        Ok(ValueRef::Text(bytes)) => {
            let s = String::from_utf8_lossy(bytes).into_owned();
            Ok(SqlValue::Text(s))
        }
        Ok(ValueRef::Blob(_)) => Err(DbError::Execution(
            "unexpected BLOB column in result".to_string(),
        )),
    }
}

/// Run a prepared statement and collect its rows into the normalized shape.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, DbError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(8);
    result_set.set_column_names(std::sync::Arc::new(column_names));

    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

/// Execute a batch of statements inside one transaction.
pub async fn execute_batch(sqlite_client: &Object, sql: &str) -> Result<(), DbError> {
    let sql_owned = sql.to_owned();

    sqlite_client
        .interact(move |conn| {
            let tx = conn.transaction().map_err(DbError::Sqlite)?;
            tx.execute_batch(&sql_owned).map_err(DbError::Sqlite)?;
            tx.commit().map_err(DbError::Sqlite)
        })
        .await?
}

/// Execute a SELECT with bare `?` placeholders; SQLite understands them
/// natively so no rewriting happens here.
pub async fn execute_select(
    sqlite_client: &Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<ResultSet, DbError> {
    let sql_owned = sql.to_owned();
    let params_owned = convert_params(params);

    sqlite_client
        .interact(move |conn| {
            let mut stmt = conn.prepare(&sql_owned).map_err(DbError::Sqlite)?;
            build_result_set(&mut stmt, &params_owned)
        })
        .await?
}

/// Execute a single DML statement inside a short transaction.
///
/// `last_insert_id` is taken from `last_insert_rowid()` and is only
/// meaningful after an INSERT.
pub async fn execute_dml(
    sqlite_client: &Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<ResultSet, DbError> {
    let sql_owned = sql.to_owned();
    let params_owned = convert_params(params);

    sqlite_client
        .interact(move |conn| {
            let tx = conn.transaction().map_err(DbError::Sqlite)?;
            let rows = {
                let param_refs: Vec<&dyn ToSql> =
                    params_owned.iter().map(|v| v as &dyn ToSql).collect();
                let mut stmt = tx.prepare(&sql_owned).map_err(DbError::Sqlite)?;
                stmt.execute(&param_refs[..]).map_err(DbError::Sqlite)?
            };
            let last_id = tx.last_insert_rowid();
            tx.commit().map_err(DbError::Sqlite)?;

            Ok(ResultSet::from_dml(rows, (last_id > 0).then_some(last_id)))
        })
        .await?
}
