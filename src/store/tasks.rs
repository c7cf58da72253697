use chrono::NaiveDate;

use super::{opt_date, opt_float, opt_text, Store};
use crate::error::DbError;
use crate::model::{Task, TaskPatch, TaskPriority, TaskStatus};
use crate::pool::QueryExecutor;
use crate::types::{DatabaseType, SqlValue};

/// A fully validated task insert (defaults already applied).
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Vec<String>,
}

/// Optional predicates for task listing; combined with AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub project_id: Option<i64>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

const INSERT_TASK: &str = "INSERT INTO tasks \
    (project_id, title, description, status, priority, due_date, \
     estimated_hours, actual_hours, tags, created_at, updated_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

// Omitted fields bind NULL so COALESCE keeps the stored value.
const UPDATE_TASK: &str = "UPDATE tasks SET \
    title = COALESCE(?, title), \
    description = COALESCE(?, description), \
    status = COALESCE(?, status), \
    priority = COALESCE(?, priority), \
    due_date = COALESCE(?, due_date), \
    estimated_hours = COALESCE(?, estimated_hours), \
    actual_hours = COALESCE(?, actual_hours), \
    tags = COALESCE(?, tags), \
    updated_at = ? \
    WHERE id = ?";

impl Store {
    /// Insert a task and return the stored row. The caller has already
    /// verified that the project exists.
    ///
    /// # Errors
    ///
    /// Propagates driver errors unchanged.
    pub async fn create_task(&self, task: &CreateTask) -> Result<Task, DbError> {
        let now = Self::now();
        let params = [
            SqlValue::Int(task.project_id),
            SqlValue::Text(task.title.clone()),
            opt_text(task.description.as_deref()),
            SqlValue::Text(task.status.as_str().to_string()),
            SqlValue::Text(task.priority.as_str().to_string()),
            opt_date(task.due_date),
            opt_float(task.estimated_hours),
            opt_float(task.actual_hours),
            Task::tags_param(&task.tags),
            SqlValue::Timestamp(now),
            SqlValue::Timestamp(now),
        ];

        let mut conn = self.conn().await?;
        match self.database().db_type {
            DatabaseType::Postgres => {
                let sql = format!("{INSERT_TASK} RETURNING *");
                let rs = conn.execute_select(&sql, &params).await?;
                let row = rs.rows.first().ok_or_else(|| {
                    DbError::Execution("INSERT ... RETURNING produced no row".to_string())
                })?;
                Task::from_row(row)
            }
            DatabaseType::Sqlite => {
                let rs = conn.execute_dml(INSERT_TASK, &params).await?;
                let id = rs.last_insert_id.ok_or_else(|| {
                    DbError::Execution("INSERT reported no generated row id".to_string())
                })?;
                self.get_task(id)
                    .await?
                    .ok_or_else(|| DbError::Execution("inserted task row not found".to_string()))
            }
        }
    }

    /// Fetch a task by id.
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>, DbError> {
        let mut conn = self.conn().await?;
        let rs = conn
            .execute_select("SELECT * FROM tasks WHERE id = ?", &[SqlValue::Int(id)])
            .await?;
        rs.rows.first().map(Task::from_row).transpose()
    }

    /// List tasks matching the filter, newest first.
    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, DbError> {
        let mut sql = String::from("SELECT * FROM tasks");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<SqlValue> = Vec::new();

        if let Some(project_id) = filter.project_id {
            clauses.push("project_id = ?");
            params.push(SqlValue::Int(project_id));
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            params.push(SqlValue::Text(status.as_str().to_string()));
        }
        if let Some(priority) = filter.priority {
            clauses.push("priority = ?");
            params.push(SqlValue::Text(priority.as_str().to_string()));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut conn = self.conn().await?;
        let rs = conn.execute_select(&sql, &params).await?;
        rs.rows.iter().map(Task::from_row).collect()
    }

    /// Coalesce-update a task: omitted patch fields keep their stored value,
    /// `updated_at` is always refreshed. Returns `None` when the id does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Propagates driver errors unchanged.
    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Option<Task>, DbError> {
        let params = [
            opt_text(patch.title.as_deref()),
            opt_text(patch.description.as_deref()),
            opt_text(patch.status.map(TaskStatus::as_str)),
            opt_text(patch.priority.map(TaskPriority::as_str)),
            opt_date(patch.due_date),
            opt_float(patch.estimated_hours),
            opt_float(patch.actual_hours),
            patch
                .tags
                .as_deref()
                .map_or(SqlValue::Null, Task::tags_param),
            SqlValue::Timestamp(Self::now()),
            SqlValue::Int(id),
        ];

        let mut conn = self.conn().await?;
        let rs = conn.execute_dml(UPDATE_TASK, &params).await?;
        if rs.rows_affected == 0 {
            return Ok(None);
        }
        self.get_task(id).await
    }

    /// Delete a task; returns whether a row existed.
    pub async fn delete_task(&self, id: i64) -> Result<bool, DbError> {
        let mut conn = self.conn().await?;
        let rs = conn
            .execute_dml("DELETE FROM tasks WHERE id = ?", &[SqlValue::Int(id)])
            .await?;
        Ok(rs.rows_affected > 0)
    }
}
