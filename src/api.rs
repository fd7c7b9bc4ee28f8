//! Local HTTP API for EchoVault
//!
//! Exposes the journal to a local UI: the memory collection, add and delete,
//! the filtered view and the insight list. The server binds to loopback by
//! default and has no authentication (single user, local only).
//!
//! ## Endpoint Map
//!
//! | Prefix              | Module | Description                        |
//! |---------------------|--------|------------------------------------|
//! | `/health`           | api    | Liveness probe                     |
//! | `/api/v1/memories*` | memory | List, search, add, get, delete     |
//! | `/api/v1/insights`  | memory | Insights and rankings              |
//! | `/api/v1/stats`     | memory | Totals, weekly count, daily average|
//! | `/api/v1/catalog`   | memory | Emotions and quick tags            |

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::memory::{memories_router, MemoriesState};
use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete EchoVault HTTP application
pub fn build_app(memories: MemoriesState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(memories_router(memories))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors_origins))
}

/// Serve the API until Ctrl+C, then flush any change whose persist failed.
pub async fn serve(config: &ServerConfig, memories: MemoriesState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("EchoVault API listening on http://{}", addr);

    let app = build_app(memories.clone(), &config.cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("server error: {}", e)))?;

    tracing::info!("Shutting down...");
    let store = memories.store.read().await;
    if store.is_dirty() {
        store.persist()?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}
