//! Advice handler

use crate::error::ApiError;
use crate::AppState;
use almanac_core::{AdviceRequest, AdviceResponse};
use axum::{body::Bytes, extract::State, Json};

/// The credential is checked before the body is read, so an unconfigured
/// server answers 500 even for malformed requests.
pub async fn advise(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AdviceResponse>, ApiError> {
    state.advice.api_key()?;
    // `null` binds as an empty request
    let req = super::parse_body::<Option<AdviceRequest>>(&body)?.unwrap_or_default();
    Ok(Json(state.advice.advise(&req).await?))
}
