use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::DbError;
use crate::results::DbRow;
use crate::types::SqlValue;

/// Task workflow state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    OnHold,
}

impl TaskStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::OnHold => "on_hold",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            "on_hold" => Some(TaskStatus::OnHold),
            _ => None,
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            "critical" => Some(TaskPriority::Critical),
            _ => None,
        }
    }
}

/// A named grouping entity owning zero or more tasks.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A unit of trackable work owned by a project.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request body for creating a project. `name` is validated by the handler
/// so a missing field yields a 400, not a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct NewProject {
    pub name: Option<String>,
}

/// Request body for creating a task. Required fields are `Option` for the
/// same reason as [`NewProject`]; defaults are applied by the handler.
#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub project_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
}

/// Partial update: every omitted field keeps its stored value.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
}

fn column<'a>(row: &'a DbRow, name: &str) -> Result<&'a SqlValue, DbError> {
    row.get(name)
        .ok_or_else(|| DbError::Execution(format!("missing column '{name}' in result row")))
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, DbError> {
    value.ok_or_else(|| DbError::Execution(format!("unexpected value in column '{name}'")))
}

impl Project {
    /// Map a normalized result row onto a project.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Execution` if a column is missing or has an
    /// unexpected representation.
    pub fn from_row(row: &DbRow) -> Result<Self, DbError> {
        Ok(Project {
            id: required(column(row, "id")?.as_int(), "id")?,
            name: required(column(row, "name")?.as_text(), "name")?.to_string(),
            created_at: required(column(row, "created_at")?.as_timestamp(), "created_at")?,
            updated_at: required(column(row, "updated_at")?.as_timestamp(), "updated_at")?,
        })
    }
}

impl Task {
    /// Map a normalized result row onto a task. Tags come back as a JSON
    /// array from either backend (the SQLite adapter's text is reparsed by
    /// `SqlValue::as_json`).
    ///
    /// # Errors
    ///
    /// Returns `DbError::Execution` if a column is missing or has an
    /// unexpected representation.
    pub fn from_row(row: &DbRow) -> Result<Self, DbError> {
        let status_raw = required(column(row, "status")?.as_text(), "status")?;
        let status = required(TaskStatus::parse(status_raw), "status")?;
        let priority_raw = required(column(row, "priority")?.as_text(), "priority")?;
        let priority = required(TaskPriority::parse(priority_raw), "priority")?;

        let tags_value = required(column(row, "tags")?.as_json(), "tags")?;
        let tags: Vec<String> = serde_json::from_value(tags_value)
            .map_err(|e| DbError::Execution(format!("malformed tags column: {e}")))?;

        Ok(Task {
            id: required(column(row, "id")?.as_int(), "id")?,
            project_id: required(column(row, "project_id")?.as_int(), "project_id")?,
            title: required(column(row, "title")?.as_text(), "title")?.to_string(),
            description: column(row, "description")?.as_text().map(str::to_string),
            status,
            priority,
            due_date: column(row, "due_date")?.as_date(),
            estimated_hours: column(row, "estimated_hours")?.as_float(),
            actual_hours: column(row, "actual_hours")?.as_float(),
            tags,
            created_at: required(column(row, "created_at")?.as_timestamp(), "created_at")?,
            updated_at: required(column(row, "updated_at")?.as_timestamp(), "updated_at")?,
        })
    }

    /// Tags as a bindable JSON parameter.
    #[must_use]
    pub fn tags_param(tags: &[String]) -> SqlValue {
        SqlValue::Json(json!(tags))
    }
}
