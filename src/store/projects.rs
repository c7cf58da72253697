use super::Store;
use crate::error::DbError;
use crate::model::Project;
use crate::pool::QueryExecutor;
use crate::types::{DatabaseType, SqlValue};

impl Store {
    /// Insert a project and return the stored row.
    ///
    /// # Errors
    ///
    /// Propagates driver errors unchanged.
    pub async fn create_project(&self, name: &str) -> Result<Project, DbError> {
        let now = Self::now();
        let params = [
            SqlValue::Text(name.to_string()),
            SqlValue::Timestamp(now),
            SqlValue::Timestamp(now),
        ];

        let mut conn = self.conn().await?;
        match self.database().db_type {
            DatabaseType::Postgres => {
                let rs = conn
                    .execute_select(
                        "INSERT INTO projects (name, created_at, updated_at) \
                         VALUES (?, ?, ?) RETURNING *",
                        &params,
                    )
                    .await?;
                let row = rs.rows.first().ok_or_else(|| {
                    DbError::Execution("INSERT ... RETURNING produced no row".to_string())
                })?;
                Project::from_row(row)
            }
            DatabaseType::Sqlite => {
                let rs = conn
                    .execute_dml(
                        "INSERT INTO projects (name, created_at, updated_at) VALUES (?, ?, ?)",
                        &params,
                    )
                    .await?;
                let id = rs.last_insert_id.ok_or_else(|| {
                    DbError::Execution("INSERT reported no generated row id".to_string())
                })?;
                self.get_project(id).await?.ok_or_else(|| {
                    DbError::Execution("inserted project row not found".to_string())
                })
            }
        }
    }

    /// Fetch a project by id.
    pub async fn get_project(&self, id: i64) -> Result<Option<Project>, DbError> {
        let mut conn = self.conn().await?;
        let rs = conn
            .execute_select("SELECT * FROM projects WHERE id = ?", &[SqlValue::Int(id)])
            .await?;
        rs.rows.first().map(Project::from_row).transpose()
    }

    /// List all projects, newest first.
    pub async fn list_projects(&self) -> Result<Vec<Project>, DbError> {
        let mut conn = self.conn().await?;
        let rs = conn
            .execute_select(
                "SELECT * FROM projects ORDER BY created_at DESC, id DESC",
                &[],
            )
            .await?;
        rs.rows.iter().map(Project::from_row).collect()
    }

    /// Delete a project; returns whether a row existed.
    pub async fn delete_project(&self, id: i64) -> Result<bool, DbError> {
        let mut conn = self.conn().await?;
        let rs = conn
            .execute_dml("DELETE FROM projects WHERE id = ?", &[SqlValue::Int(id)])
            .await?;
        Ok(rs.rows_affected > 0)
    }

    /// Existence pre-check used before task inserts. Enforcing the
    /// task-to-project relationship here keeps the failure a uniform
    /// validation error on both backends instead of a driver-specific
    /// constraint violation.
    pub async fn project_exists(&self, id: i64) -> Result<bool, DbError> {
        let mut conn = self.conn().await?;
        let rs = conn
            .execute_select(
                "SELECT id FROM projects WHERE id = ?",
                &[SqlValue::Int(id)],
            )
            .await?;
        Ok(!rs.rows.is_empty())
    }
}
