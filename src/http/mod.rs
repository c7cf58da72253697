//! HTTP surface: routing, response envelope and error mapping.
//!
//! Handlers talk only to [`Store`]; they are identical for both backends.

pub mod error;
pub mod projects;
pub mod response;
pub mod tasks;

use axum::{Router, routing::get};

use crate::store::Store;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::get).delete(projects::remove),
        )
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::remove),
        )
        .with_state(state)
}
