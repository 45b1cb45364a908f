//! HTTP error responses
//!
//! Every failure leaves the API as `{"error": message}` with a status code.

use almanac_core::AlmanacError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::services::AdviceError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed request body; carries the raw parse error text
    BadRequest(String),
    NotFound(String),
    Internal(String),
    BadGateway(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Internal(m)
            | ApiError::BadGateway(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message() }));
        (self.status(), body).into_response()
    }
}

impl From<AlmanacError> for ApiError {
    fn from(e: AlmanacError) -> Self {
        match e {
            AlmanacError::EventNotFound(_) => ApiError::NotFound("Event not found".to_string()),
            AlmanacError::MemoNotFound(_) => ApiError::NotFound("Memo not found".to_string()),
            other => {
                error!("Storage failure: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<AdviceError> for ApiError {
    fn from(e: AdviceError) -> Self {
        match e {
            AdviceError::Status { .. } => ApiError::BadGateway(e.to_string()),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
