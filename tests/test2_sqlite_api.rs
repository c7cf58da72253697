use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use taskboard::http::{AppState, router};
use taskboard::{Database, Store, schema};

async fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("api_test.db");
    let db = Database::new_sqlite(path.to_str().unwrap())
        .await
        .expect("create sqlite pool");
    let mut conn = db.pool.get_connection().await.expect("checkout");
    schema::ensure_schema(&mut conn).await.expect("ensure schema");

    let app = router(AppState {
        store: Store::new(db),
    });
    (app, dir)
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn put(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Create a project through the API and return its id.
async fn create_project(app: &Router, name: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(post("/api/projects", &json!({ "name": name })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn task_create_and_fetch_envelope() {
    let (app, _dir) = test_app().await;
    let project_id = create_project(&app, "Envelope").await;

    let response = app
        .clone()
        .oneshot(post(
            "/api/tasks",
            &json!({
                "project_id": project_id,
                "title": "Write the docs",
                "priority": "high",
                "tags": ["docs", "q3"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Write the docs");
    assert_eq!(body["data"]["status"], "todo");
    assert_eq!(body["data"]["priority"], "high");
    assert_eq!(body["data"]["tags"], json!(["docs", "q3"]));
    let task_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/tasks/{task_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["tags"], json!(["docs", "q3"]));

    let response = app.oneshot(get("/api/tasks")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_required_fields_yield_400() {
    let (app, _dir) = test_app().await;
    let project_id = create_project(&app, "Validation").await;

    // Missing title.
    let response = app
        .clone()
        .oneshot(post("/api/tasks", &json!({ "project_id": project_id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("title"));

    // Missing project_id.
    let response = app
        .clone()
        .oneshot(post("/api/tasks", &json!({ "title": "No project" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing project name.
    let response = app
        .oneshot(post("/api/projects", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn absent_project_yields_400_not_500() {
    let (app, _dir) = test_app().await;

    let response = app
        .oneshot(post(
            "/api/tasks",
            &json!({ "project_id": 4242, "title": "Orphan" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_rows_yield_404() {
    let (app, _dir) = test_app().await;

    let response = app.clone().oneshot(get("/api/tasks/9000")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(put("/api/tasks/9000", &json!({ "title": "nope" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete("/api/tasks/9000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);

    let response = app.oneshot(get("/api/projects/9000")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_put_keeps_stored_fields() {
    let (app, _dir) = test_app().await;
    let project_id = create_project(&app, "Coalesce").await;

    let response = app
        .clone()
        .oneshot(post(
            "/api/tasks",
            &json!({
                "project_id": project_id,
                "title": "Stable",
                "description": "unchanged",
                "status": "in_progress",
                "estimated_hours": 4.5,
            }),
        ))
        .await
        .unwrap();
    let before = json_body(response).await;
    let task_id = before["data"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(put(&format!("/api/tasks/{task_id}"), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let after = json_body(response).await;

    for field in [
        "id",
        "project_id",
        "title",
        "description",
        "status",
        "priority",
        "due_date",
        "estimated_hours",
        "actual_hours",
        "tags",
        "created_at",
    ] {
        assert_eq!(after["data"][field], before["data"][field], "field {field}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn status_and_priority_filters_combine() {
    let (app, _dir) = test_app().await;
    let project_id = create_project(&app, "Filtering").await;

    for (title, status, priority) in [
        ("a", "done", "high"),
        ("b", "done", "low"),
        ("c", "todo", "high"),
        ("d", "done", "high"),
    ] {
        let response = app
            .clone()
            .oneshot(post(
                "/api/tasks",
                &json!({
                    "project_id": project_id,
                    "title": title,
                    "status": status,
                    "priority": priority,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get("/api/tasks?status=done&priority=high"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
    let items = body["data"].as_array().unwrap();
    // Newest first: "d" was created after "a".
    assert_eq!(items[0]["title"], "d");
    assert_eq!(items[1]["title"], "a");
    for item in items {
        assert_eq!(item["status"], "done");
        assert_eq!(item["priority"], "high");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_row() {
    let (app, _dir) = test_app().await;
    let project_id = create_project(&app, "Removal").await;

    let response = app
        .clone()
        .oneshot(post(
            "/api/tasks",
            &json!({ "project_id": project_id, "title": "short-lived" }),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    let task_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/tasks/{task_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Task deleted");

    let response = app
        .oneshot(get(&format!("/api/tasks/{task_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
