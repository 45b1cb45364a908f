//! Liveness probe

use axum::Json;
use serde_json::{json, Value};

/// Always healthy; does not touch storage.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
