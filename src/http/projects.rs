//! Project API endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::AppState;
use super::error::{ApiError, ApiResult};
use super::response::{ok, ok_list, ok_message};
use crate::model::NewProject;

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let projects = state.store.list_projects().await?;
    Ok(ok_list(projects))
}

/// GET /api/projects/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let project = state
        .store
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok(ok(project))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewProject>,
) -> ApiResult<impl IntoResponse> {
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::Validation("name is required".to_string()))?;

    let project = state.store.create_project(name).await?;
    tracing::info!(project_id = project.id, "project created");
    Ok((StatusCode::CREATED, ok(project)))
}

/// DELETE /api/projects/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.store.delete_project(id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }
    tracing::info!(project_id = id, "project deleted");
    Ok(ok_message("Project deleted"))
}
