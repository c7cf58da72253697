use std::error::Error;

use chrono::{NaiveDate, NaiveDateTime};
use deadpool_postgres::{Config as PgConfig, Object};
use serde_json::Value as JsonValue;
use tokio_postgres::{
    NoTls, Statement,
    types::{IsNull, ToSql, Type, to_sql_checked},
};
use tokio_util::bytes;

use crate::error::DbError;
use crate::pool::{Database, DbPool};
use crate::results::ResultSet;
use crate::translation::number_placeholders;
use crate::types::{DatabaseType, SqlValue};

impl Database {
    /// Build the Postgres-backed handle from a deadpool config.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Config` when a required connection field is missing
    /// and `DbError::Connection` when the pool cannot be created.
    pub async fn new_postgres(pg_config: PgConfig) -> Result<Self, DbError> {
        if pg_config.dbname.is_none() {
            return Err(DbError::Config("dbname is required".to_string()));
        }
        if pg_config.host.is_none() {
            return Err(DbError::Config("host is required".to_string()));
        }
        if pg_config.user.is_none() {
            return Err(DbError::Config("user is required".to_string()));
        }
        if pg_config.password.is_none() {
            return Err(DbError::Config("password is required".to_string()));
        }

        let pg_pool = pg_config
            .create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)
            .map_err(|e| DbError::Connection(format!("Failed to create Postgres pool: {e}")))?;

        Ok(Database {
            pool: DbPool::Postgres(pg_pool),
            db_type: DatabaseType::Postgres,
        })
    }
}

/// Container for Postgres parameters with lifetime tracking.
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    #[must_use]
    pub fn convert(params: &'a [SqlValue]) -> Params<'a> {
        let references: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        Params { references }
    }

    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Int(i) => (*i).to_sql(ty, out),
            SqlValue::Float(f) => (*f).to_sql(ty, out),
            SqlValue::Text(s) => s.to_sql(ty, out),
            SqlValue::Bool(b) => (*b).to_sql(ty, out),
            SqlValue::Timestamp(dt) => dt.to_sql(ty, out),
            SqlValue::Date(d) => d.to_sql(ty, out),
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Json(jsval) => jsval.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::CHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::JSON
                | Type::JSONB
        )
    }

    to_sql_checked!();
}

/// Extract a unified value from a row by column type name.
fn extract_value(row: &tokio_postgres::Row, idx: usize) -> Result<SqlValue, DbError> {
    let type_name = row.columns()[idx].type_().name();

    match type_name {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Int))
        }
        "float4" | "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Bool))
        }
        "timestamp" | "timestamptz" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Timestamp))
        }
        "date" => {
            let val: Option<NaiveDate> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Date))
        }
        "json" | "jsonb" => {
            let val: Option<JsonValue> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Json))
        }
        _ => {
            // text, varchar, and anything else readable as text
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(SqlValue::Null, SqlValue::Text))
        }
    }
}

/// Collect the rows of an executed statement into the normalized shape.
async fn build_result_set(
    stmt: &Statement,
    params: &[&(dyn ToSql + Sync)],
    client: &Object,
) -> Result<ResultSet, DbError> {
    let rows = client.query(stmt, params).await?;

    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(std::sync::Arc::new(column_names));

    for row in rows {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(extract_value(&row, i)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

/// Execute a batch of statements inside one transaction.
pub async fn execute_batch(pg_client: &mut Object, sql: &str) -> Result<(), DbError> {
    let tx = pg_client.transaction().await?;
    tx.batch_execute(sql).await?;
    tx.commit().await?;
    Ok(())
}

/// Execute a SELECT (or DML with `RETURNING`): bare `?` placeholders are
/// rewritten to `$N` before the statement reaches the driver.
pub async fn execute_select(
    pg_client: &mut Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<ResultSet, DbError> {
    let sql = number_placeholders(sql);
    let params = Params::convert(params);
    let stmt = pg_client.prepare(&sql).await?;
    build_result_set(&stmt, params.as_refs(), pg_client).await
}

/// Execute a DML statement and report the affected-row count.
pub async fn execute_dml(
    pg_client: &mut Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<ResultSet, DbError> {
    let sql = number_placeholders(sql);
    let params = Params::convert(params);
    let tx = pg_client.transaction().await?;
    let stmt = tx.prepare(&sql).await?;
    let rows = tx.execute(&stmt, params.as_refs()).await?;
    tx.commit().await?;

    Ok(ResultSet::from_dml(
        usize::try_from(rows).unwrap_or(usize::MAX),
        None,
    ))
}
