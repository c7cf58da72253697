use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde_json::Value as JsonValue;

/// Values that can be stored in a database row or bound as query parameters.
///
/// The same enum is used for both backends so store code never branches on
/// driver types. Backend-specific representations (SQLite storing booleans as
/// integers, timestamps and JSON as text) are absorbed by the accessors below.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// Calendar date value
    Date(NaiveDate),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let SqlValue::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(value) => Some(*value),
            SqlValue::Int(0) => Some(false),
            SqlValue::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamps read from SQLite arrive as text; accept both forms.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        }
        if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    /// Dates read from SQLite arrive as `YYYY-MM-DD` text.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        if let SqlValue::Date(value) = self {
            return Some(*value);
        }
        if let Some(s) = self.as_text() {
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(d);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SqlValue::Float(value) => Some(*value),
            SqlValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// JSON columns come back natively from Postgres (`jsonb`) but as
    /// serialized text from SQLite; reparse in the latter case so callers
    /// only ever see structured values.
    #[must_use]
    pub fn as_json(&self) -> Option<JsonValue> {
        match self {
            SqlValue::Json(value) => Some(value.clone()),
            SqlValue::Text(s) => serde_json::from_str(s).ok(),
            _ => None,
        }
    }
}

/// The two relational stores supported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DatabaseType {
    /// `PostgreSQL` database
    Postgres,
    /// `SQLite` database
    Sqlite,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_coercion_from_sqlite_integers() {
        assert_eq!(SqlValue::Int(1).as_bool(), Some(true));
        assert_eq!(SqlValue::Int(0).as_bool(), Some(false));
        assert_eq!(SqlValue::Int(2).as_bool(), None);
        assert_eq!(SqlValue::Bool(true).as_bool(), Some(true));
    }

    #[test]
    fn timestamp_parses_text_with_and_without_fraction() {
        let plain = SqlValue::Text("2024-01-03 10:30:00".to_string());
        assert!(plain.as_timestamp().is_some());
        let frac = SqlValue::Text("2024-01-03 10:30:00.123456".to_string());
        assert!(frac.as_timestamp().is_some());
        assert_eq!(SqlValue::Text("not a time".to_string()).as_timestamp(), None);
    }

    #[test]
    fn json_reparses_serialized_text() {
        let native = SqlValue::Json(json!(["a", "b"]));
        assert_eq!(native.as_json(), Some(json!(["a", "b"])));

        let text = SqlValue::Text(r#"["a","b"]"#.to_string());
        assert_eq!(text.as_json(), Some(json!(["a", "b"])));

        assert_eq!(SqlValue::Int(3).as_json(), None);
    }

    #[test]
    fn date_parses_text() {
        let d = SqlValue::Text("2024-06-01".to_string());
        assert_eq!(
            d.as_date(),
            Some(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
    }
}
