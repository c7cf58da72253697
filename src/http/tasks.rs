//! Task API endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use super::AppState;
use super::error::{ApiError, ApiResult};
use super::response::{ok, ok_list, ok_message};
use crate::model::{NewTask, TaskPatch, TaskPriority, TaskStatus};
use crate::store::{CreateTask, TaskFilter};

/// Query-string filters for task listing.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub project_id: Option<i64>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<impl IntoResponse> {
    let tasks = state
        .store
        .list_tasks(TaskFilter {
            project_id: query.project_id,
            status: query.status,
            priority: query.priority,
        })
        .await?;
    Ok(ok_list(tasks))
}

/// GET /api/tasks/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let task = state
        .store
        .get_task(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    Ok(ok(task))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewTask>,
) -> ApiResult<impl IntoResponse> {
    let project_id = body
        .project_id
        .ok_or_else(|| ApiError::Validation("project_id is required".to_string()))?;
    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("title is required".to_string()))?
        .to_string();

    if !state.store.project_exists(project_id).await? {
        return Err(ApiError::Validation("Project not found".to_string()));
    }

    let task = state
        .store
        .create_task(&CreateTask {
            project_id,
            title,
            description: body.description,
            status: body.status.unwrap_or_default(),
            priority: body.priority.unwrap_or_default(),
            due_date: body.due_date,
            estimated_hours: body.estimated_hours,
            actual_hours: body.actual_hours,
            tags: body.tags.unwrap_or_default(),
        })
        .await?;

    tracing::info!(task_id = task.id, project_id, "task created");
    Ok((StatusCode::CREATED, ok(task)))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<impl IntoResponse> {
    let task = state
        .store
        .update_task(id, &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    Ok(ok(task))
}

/// DELETE /api/tasks/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.store.delete_task(id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }
    tracing::info!(task_id = id, "task deleted");
    Ok(ok_message("Task deleted"))
}
