//! Event handlers

use crate::error::ApiError;
use crate::AppState;
use almanac_core::{Event, EventPayload};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.events.list().await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Event>, ApiError> {
    let payload: EventPayload = super::parse_body(&body)?;
    Ok(Json(state.events.create(payload).await?))
}

/// Look up first (404), then bind the body onto the stored record (400).
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Event>, ApiError> {
    let event = state.events.get(&id).await?;
    let payload: EventPayload = super::parse_body(&body)?;
    Ok(Json(state.events.update(event, payload).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.events.delete(&id).await?;
    Ok(super::deleted())
}
