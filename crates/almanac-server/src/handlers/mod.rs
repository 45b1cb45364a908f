//! HTTP handlers

pub mod advice;
pub mod events;
pub mod health;
pub mod memos;

pub use health::health;

use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ApiError;

/// Decode a JSON request body.
///
/// Bodies are read as raw bytes so a malformed payload surfaces as a 400 with
/// the decoder's own message, whatever the Content-Type header says.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::from(e)
    })
}

pub(crate) fn deleted() -> Json<Value> {
    Json(json!({ "status": "deleted" }))
}
