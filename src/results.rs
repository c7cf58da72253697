use std::collections::HashMap;
use std::sync::Arc;

use crate::types::SqlValue;

/// A single row from a query result.
///
/// Column names are shared across all rows of a result set, together with a
/// name-to-index cache so repeated lookups by name stay cheap.
#[derive(Debug, Clone)]
pub struct DbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<SqlValue>,
    #[doc(hidden)]
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl DbRow {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        let cache = Arc::new(build_index_cache(&column_names));
        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    /// Get the index of a column by name.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }
}

fn build_index_cache(column_names: &[String]) -> HashMap<String, usize> {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}

/// The normalized result of a query, identical in shape for both backends.
///
/// `rows` holds result rows (SELECT, or INSERT with `RETURNING`);
/// `rows_affected` counts DML matches; `last_insert_id` is set by the SQLite
/// adapter after an INSERT without a `RETURNING` clause.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<DbRow>,
    /// The number of rows affected (for DML statements)
    pub rows_affected: usize,
    /// Generated row id of the last INSERT (SQLite only)
    pub last_insert_id: Option<i64>,
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            ..ResultSet::default()
        }
    }

    /// Result of a DML statement: no rows, just the affected count and
    /// (for SQLite inserts) the generated row id.
    #[must_use]
    pub fn from_dml(rows_affected: usize, last_insert_id: Option<i64>) -> ResultSet {
        ResultSet {
            rows_affected,
            last_insert_id,
            ..ResultSet::default()
        }
    }

    /// Set the column names shared by all rows of this result set.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index_cache = Some(Arc::new(build_index_cache(&column_names)));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row built from the shared column names. No-op until
    /// [`ResultSet::set_column_names`] has been called.
    pub fn add_row_values(&mut self, values: Vec<SqlValue>) {
        if let (Some(column_names), Some(cache)) = (&self.column_names, &self.column_index_cache) {
            self.rows.push(DbRow {
                column_names: column_names.clone(),
                values,
                column_index_cache: cache.clone(),
            });
            self.rows_affected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_index() {
        let cols = Arc::new(vec!["id".to_string(), "name".to_string()]);
        let row = DbRow::new(cols, vec![SqlValue::Int(7), SqlValue::Text("x".into())]);
        assert_eq!(row.get("id").and_then(SqlValue::as_int), Some(7));
        assert_eq!(row.get_by_index(1).and_then(|v| v.as_text()), Some("x"));
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn result_set_shares_columns_across_rows() {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(Arc::new(vec!["a".to_string()]));
        rs.add_row_values(vec![SqlValue::Int(1)]);
        rs.add_row_values(vec![SqlValue::Int(2)]);
        assert_eq!(rs.rows.len(), 2);
        assert_eq!(rs.rows_affected, 2);
        assert_eq!(rs.rows[1].get("a").and_then(SqlValue::as_int), Some(2));
    }
}
