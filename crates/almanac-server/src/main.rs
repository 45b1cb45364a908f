//! Almanac Server
//!
//! Calendar events, memos and weather-based outfit advice over a JSON API.

use almanac_core::ports::{EventStore, MemoStore};
use almanac_server::config::{Config, StorageBackend};
use almanac_server::services::AdviceService;
use almanac_server::storage::{Database, MemoryStore};
use almanac_server::{build_router, AppState};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Almanac Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    info!("Loading configuration...");
    let config = Config::load().context("Failed to load configuration")?;
    let backend = config
        .storage_backend()
        .context("Invalid storage configuration")?;
    info!("Config loaded: bind={}, storage={}", config.bind_address, backend);

    let (event_store, memo_store): (Arc<dyn EventStore>, Arc<dyn MemoStore>) = match backend {
        StorageBackend::Postgres => {
            let db = Arc::new(
                Database::connect(&config.database_url)
                    .await
                    .context("Failed to initialize database")?,
            );
            (db.clone(), db)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, data will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
    };

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set, advice requests will fail");
    }
    let advice = AdviceService::new(
        config.gemini_api_key.clone(),
        config.gemini_endpoint.clone(),
    );

    let state = AppState::new(event_store, memo_store, advice);

    info!("Building HTTP router...");
    let app = build_router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server ready to accept connections");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
