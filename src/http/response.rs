use axum::Json;
use serde::Serialize;
use serde_json::{Value, json};

/// `200 {success, data}`
pub fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
    }))
}

/// `200 {success, data, count}` for list endpoints.
pub fn ok_list<T: Serialize>(data: Vec<T>) -> Json<Value> {
    let count = data.len();
    Json(json!({
        "success": true,
        "data": data,
        "count": count,
    }))
}

/// `200 {success, message}` for deletions.
pub fn ok_message(message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
    }))
}
