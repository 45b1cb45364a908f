//! Memo handlers

use crate::error::ApiError;
use crate::AppState;
use almanac_core::{Memo, MemoPayload};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Memo>>, ApiError> {
    Ok(Json(state.memos.list().await?))
}

pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Json<Memo>, ApiError> {
    let payload: MemoPayload = super::parse_body(&body)?;
    Ok(Json(state.memos.create(payload).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Memo>, ApiError> {
    let memo = state.memos.get(&id).await?;
    let payload: MemoPayload = super::parse_body(&body)?;
    Ok(Json(state.memos.update(memo, payload).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.memos.delete(&id).await?;
    Ok(super::deleted())
}

#[cfg(test)]
mod tests {
    use crate::test_support::{memory_app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn create(app: &axum::Router, body: Value) -> Value {
        let (status, memo) = send(app, Method::POST, "/api/memos", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        memo
    }

    fn titles(list: &Value) -> Vec<&str> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|m| m["Title"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_list_orders_by_updated_desc() {
        let app = memory_app();
        let a = create(&app, json!({ "Title": "A" })).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        create(&app, json!({ "Title": "B" })).await;

        let (_, list) = send(&app, Method::GET, "/api/memos", None).await;
        assert_eq!(titles(&list), vec!["B", "A"]);

        tokio::time::sleep(Duration::from_millis(5)).await;
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/memos/{}", a["ID"].as_str().unwrap()),
            Some(json!({ "Content": "touched" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = send(&app, Method::GET, "/api/memos", None).await;
        assert_eq!(titles(&list), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_linked_date_round_trip() {
        let app = memory_app();
        let memo = create(
            &app,
            json!({ "Title": "Trip", "LinkedDate": "2024-07-20T00:00:00Z", "ThemeColor": "#ffcc00" }),
        )
        .await;
        assert_eq!(memo["LinkedDate"], "2024-07-20T00:00:00Z");
        assert_eq!(memo["CreatedAt"], memo["UpdatedAt"]);

        let path = format!("/api/memos/{}", memo["ID"].as_str().unwrap());

        let (_, kept) = send(&app, Method::PUT, &path, Some(json!({ "Title": "Trip!" }))).await;
        assert_eq!(kept["LinkedDate"], "2024-07-20T00:00:00Z");
        assert_eq!(kept["ThemeColor"], "#ffcc00");

        let (_, cleared) = send(&app, Method::PUT, &path, Some(json!({ "LinkedDate": null }))).await;
        assert_eq!(cleared["LinkedDate"], Value::Null);
        assert_eq!(cleared["Title"], "Trip!");
    }

    #[tokio::test]
    async fn test_update_missing_memo() {
        let app = memory_app();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/memos/0f8e2a55-31c4-4d7b-8a42-6a3f1e9b7c10",
            Some(json!({ "Title": "nope" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Memo not found");
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_types() {
        let app = memory_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/memos",
            Some(json!({ "Content": ["not", "a", "string"] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid type"));
    }

    #[tokio::test]
    async fn test_delete_missing_memo() {
        let app = memory_app();
        let (status, body) = send(
            &app,
            Method::DELETE,
            "/api/memos/0f8e2a55-31c4-4d7b-8a42-6a3f1e9b7c10",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "deleted");
    }

    #[tokio::test]
    async fn test_linked_date_in_camel_case() {
        let app = memory_app();
        let memo = create(
            &app,
            json!({ "title": "Trip", "linkedDate": "2024-07-20T00:00:00Z", "themeColor": "teal" }),
        )
        .await;
        assert_eq!(memo["LinkedDate"], "2024-07-20T00:00:00Z");
        assert_eq!(memo["ThemeColor"], "teal");

        let path = format!("/api/memos/{}", memo["ID"].as_str().unwrap());
        let (status, updated) = send(&app, Method::PUT, &path, Some(json!({ "linkedDate": null }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["LinkedDate"], Value::Null);
        assert_eq!(updated["ThemeColor"], "teal");
    }
}
