//! Almanac Server
//!
//! JSON API over calendar events and memos, plus an outfit-advice proxy to
//! the Gemini API. Every request is one storage call or one outbound call.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod storage;

use almanac_core::ports::{EventStore, MemoStore};
use axum::{
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use services::{AdviceService, EventService, MemoService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
    pub memos: Arc<MemoService>,
    pub advice: Arc<AdviceService>,
}

impl AppState {
    pub fn new(
        event_store: Arc<dyn EventStore>,
        memo_store: Arc<dyn MemoStore>,
        advice: AdviceService,
    ) -> Self {
        Self {
            events: Arc::new(EventService::new(event_store)),
            memos: Arc::new(MemoService::new(memo_store)),
            advice: Arc::new(advice),
        }
    }
}

/// Full HTTP app: API routes under `/api`, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(handlers::events::list).post(handlers::events::create),
        )
        .route(
            "/events/:id",
            put(handlers::events::update).delete(handlers::events::delete),
        )
        .route(
            "/memos",
            get(handlers::memos::list).post(handlers::memos::create),
        )
        .route(
            "/memos/:id",
            put(handlers::memos::update).delete(handlers::memos::delete),
        )
        .route("/advice", post(handlers::advice::advise))
        .route("/health", get(handlers::health))
}

/// Any origin, with credentials. The origin is mirrored back because a
/// wildcard cannot be combined with credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::storage::MemoryStore;
    use axum::{
        body::Body,
        extract::Query,
        http::{Request, StatusCode},
        Json,
    };
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    pub fn app_with_advice(api_key: Option<&str>, endpoint: &str) -> Router {
        let store = Arc::new(MemoryStore::new());
        let advice = AdviceService::new(api_key.map(str::to_string), endpoint.to_string());
        build_router(AppState::new(store.clone(), store, advice))
    }

    pub fn memory_app() -> Router {
        app_with_advice(None, crate::config::DEFAULT_GEMINI_ENDPOINT)
    }

    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let body = body.map(|b| b.to_string()).unwrap_or_default();
        send_raw(app, method, uri, &body).await
    }

    pub async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub struct SeenRequest {
        pub key: Option<String>,
        pub body: Value,
    }

    /// Local stand-in for the generateContent endpoint
    pub struct FakeGemini {
        pub endpoint: String,
        hits: Arc<AtomicUsize>,
        last: Arc<Mutex<Option<SeenRequest>>>,
    }

    impl FakeGemini {
        pub async fn start(status: StatusCode, reply: Value) -> Self {
            let hits = Arc::new(AtomicUsize::new(0));
            let last = Arc::new(Mutex::new(None));

            let (hits_c, last_c) = (hits.clone(), last.clone());
            let app = Router::new().route(
                "/generate",
                post(
                    move |Query(query): Query<HashMap<String, String>>, Json(body): Json<Value>| {
                        let hits = hits_c.clone();
                        let last = last_c.clone();
                        let reply = reply.clone();
                        async move {
                            hits.fetch_add(1, Ordering::SeqCst);
                            *last.lock().unwrap() = Some(SeenRequest {
                                key: query.get("key").cloned(),
                                body,
                            });
                            (status, Json(reply))
                        }
                    },
                ),
            );

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                endpoint: format!("http://{}/generate", addr),
                hits,
                last,
            }
        }

        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<SeenRequest> {
            self.last.lock().unwrap().take()
        }
    }
}
