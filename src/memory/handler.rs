//! HTTP handlers for the Memories API
//!
//! Provides 7 REST endpoints:
//! - GET    /api/v1/memories         all memories, or those matching `?q=`
//! - GET    /api/v1/memories/:id     memory detail
//! - POST   /api/v1/memories         record a memory
//! - DELETE /api/v1/memories/:id     delete a memory
//! - GET    /api/v1/insights         insights plus the rankings behind them
//! - GET    /api/v1/stats            totals for the stats panel
//! - GET    /api/v1/catalog          selectable emotions and quick tags

use crate::error::Error;
use crate::memory::emotion::Emotion;
use crate::memory::insight::{Insight, MemoryStats};
use crate::memory::record::{validate_content, MemoryRecord, NewMemory, QUICK_TAGS};
use crate::memory::store::MemoryStore;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared state for memory handlers
#[derive(Clone)]
pub struct MemoriesState {
    pub store: Arc<RwLock<MemoryStore>>,
    /// Input limit for new memories, in characters
    pub max_content_chars: usize,
}

impl MemoriesState {
    pub fn new(store: MemoryStore) -> Self {
        let max_content_chars = store.config().max_content_chars;
        Self {
            store: Arc::new(RwLock::new(store)),
            max_content_chars,
        }
    }
}

/// Create the memories router with all REST endpoints
pub fn memories_router(state: MemoriesState) -> Router {
    Router::new()
        .route("/api/v1/memories", get(list_memories).post(create_memory))
        .route(
            "/api/v1/memories/:id",
            get(get_memory).delete(delete_memory),
        )
        .route("/api/v1/insights", get(get_insights))
        .route("/api/v1/stats", get(get_stats))
        .route("/api/v1/catalog", get(get_catalog))
        .with_state(state)
}

// =============================================================================
// Wire types
// =============================================================================

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

fn error_response(err: Error) -> Response {
    if err.is_validation() {
        (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(err.to_string()))).into_response()
    } else {
        tracing::warn!("Memory API failure: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::internal(err.to_string())),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ListMemoriesQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MemoryList {
    data: Vec<MemoryRecord>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: bool,
}

/// A ranked label with its occurrence count
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLabel {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsightsResponse {
    insights: Vec<Insight>,
    top_emotions: Vec<RankedLabel>,
    focus_tags: Vec<RankedLabel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Catalog {
    emotions: Vec<&'static str>,
    quick_tags: Vec<&'static str>,
    max_content_chars: usize,
}

fn ranked(pairs: Vec<(String, usize)>) -> Vec<RankedLabel> {
    pairs
        .into_iter()
        .map(|(label, count)| RankedLabel { label, count })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/memories
async fn list_memories(
    State(state): State<MemoriesState>,
    Query(params): Query<ListMemoriesQuery>,
) -> impl IntoResponse {
    let store = state.store.read().await;
    let data: Vec<MemoryRecord> = store
        .filter(params.q.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    Json(MemoryList {
        total: data.len(),
        data,
    })
}

/// GET /api/v1/memories/:id
async fn get_memory(State(state): State<MemoriesState>, Path(id): Path<u64>) -> Response {
    let store = state.store.read().await;
    match store.get(id) {
        Some(record) => (StatusCode::OK, Json(record.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError::not_found(format!("Memory {} not found", id))),
        )
            .into_response(),
    }
}

/// POST /api/v1/memories
async fn create_memory(
    State(state): State<MemoriesState>,
    Json(request): Json<NewMemory>,
) -> Response {
    if let Err(err) = validate_content(&request.content, state.max_content_chars) {
        return error_response(err);
    }
    if let Some(Emotion::Other(label)) = &request.emotion {
        return error_response(Error::Validation(format!("unknown emotion '{}'", label)));
    }

    let mut store = state.store.write().await;
    match store.add(request) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

/// DELETE /api/v1/memories/:id
async fn delete_memory(State(state): State<MemoriesState>, Path(id): Path<u64>) -> Response {
    let mut store = state.store.write().await;
    match store.delete(id) {
        Ok(deleted) => (StatusCode::OK, Json(Deleted { deleted })).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/v1/insights
async fn get_insights(State(state): State<MemoriesState>) -> impl IntoResponse {
    let store = state.store.read().await;
    let now = chrono::Utc::now();
    let aggregator = store.aggregator();
    Json(InsightsResponse {
        insights: store.insights(now),
        top_emotions: ranked(aggregator.top_emotions(store.records())),
        focus_tags: ranked(aggregator.recent_focus_tags(store.records())),
    })
}

/// GET /api/v1/stats
async fn get_stats(State(state): State<MemoriesState>) -> Json<MemoryStats> {
    let store = state.store.read().await;
    Json(store.stats(chrono::Utc::now()))
}

/// GET /api/v1/catalog
async fn get_catalog(State(state): State<MemoriesState>) -> impl IntoResponse {
    Json(Catalog {
        emotions: Emotion::ALL.iter().map(Emotion::display_label).collect(),
        quick_tags: QUICK_TAGS.to_vec(),
        max_content_chars: state.max_content_chars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JournalConfig;
    use crate::memory::backend::{FileSlot, MemorySlot};
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn make_app() -> Router {
        memories_router(MemoriesState::new(MemoryStore::open(MemorySlot::new())))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_memories_empty() {
        let app = make_app();
        let resp = app.oneshot(get_req("/api/v1/memories")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn test_create_and_get_memory() {
        let app = make_app();

        let resp = app
            .clone()
            .oneshot(post_json(
                "/api/v1/memories",
                serde_json::json!({
                    "content": "Had an amazing day meeting new people",
                    "tags": ["Personal"]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        assert_eq!(created["emotion"], "excited");
        assert_eq!(created["tags"][0], "Personal");
        assert_eq!(created["aiSummary"], "Had an amazing day meeting new people");
        let id = created["id"].as_u64().unwrap();

        let resp = app
            .oneshot(get_req(&format!("/api/v1/memories/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched = body_json(resp).await;
        assert_eq!(fetched["id"], id);
        assert_eq!(fetched["content"], "Had an amazing day meeting new people");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let app = make_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/api/v1/memories",
                serde_json::json!({ "content": "   " }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let resp = app.oneshot(get_req("/api/v1/memories")).await.unwrap();
        assert_eq!(body_json(resp).await["total"], 0);
    }

    #[tokio::test]
    async fn test_create_rejects_over_limit() {
        let app = make_app();
        let resp = app
            .oneshot(post_json(
                "/api/v1/memories",
                serde_json::json!({ "content": "x".repeat(501) }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_emotion() {
        let app = make_app();
        let resp = app
            .oneshot(post_json(
                "/api/v1/memories",
                serde_json::json!({ "content": "hello", "emotion": "furious" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"]["message"].as_str().unwrap().contains("furious"));
    }

    #[tokio::test]
    async fn test_create_with_chosen_emotion() {
        let app = make_app();
        let resp = app
            .oneshot(post_json(
                "/api/v1/memories",
                serde_json::json!({ "content": "Quiet evening", "emotion": "grateful" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["emotion"], "grateful");
    }

    #[tokio::test]
    async fn test_search_and_delete() {
        let app = make_app();
        for (content, tag) in [("Coffee with Ana", "People"), ("Quarterly review", "Work")] {
            let resp = app
                .clone()
                .oneshot(post_json(
                    "/api/v1/memories",
                    serde_json::json!({ "content": content, "tags": [tag] }),
                ))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = app
            .clone()
            .oneshot(get_req("/api/v1/memories?q=work"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["total"], 1);
        let id = json["data"][0]["id"].as_u64().unwrap();

        let delete = |id: u64| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/memories/{}", id))
                .body(Body::empty())
                .unwrap()
        };

        let resp = app.clone().oneshot(delete(id)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["deleted"], true);

        // Second delete is a no-op
        let resp = app.clone().oneshot(delete(id)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["deleted"], false);

        let resp = app.oneshot(get_req("/api/v1/memories")).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["data"][0]["content"], "Coffee with Ana");
    }

    #[tokio::test]
    async fn test_get_memory_not_found() {
        let app = make_app();
        let resp = app.oneshot(get_req("/api/v1/memories/12345")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_insights_and_stats() {
        let app = make_app();

        let resp = app.clone().oneshot(get_req("/api/v1/insights")).await.unwrap();
        let json = body_json(resp).await;
        assert!(json["insights"].as_array().unwrap().is_empty());

        for content in ["So happy today", "Pure joy", "Calm morning"] {
            app.clone()
                .oneshot(post_json(
                    "/api/v1/memories",
                    serde_json::json!({ "content": content, "tags": ["Personal"] }),
                ))
                .await
                .unwrap();
        }

        let resp = app.clone().oneshot(get_req("/api/v1/insights")).await.unwrap();
        let json = body_json(resp).await;
        let insights = json["insights"].as_array().unwrap();
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0]["title"], "Emotional Pattern");
        assert_eq!(json["topEmotions"][0]["label"], "joy");
        assert_eq!(json["topEmotions"][0]["count"], 2);
        assert_eq!(json["focusTags"][0]["label"], "Personal");

        let resp = app.oneshot(get_req("/api/v1/stats")).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["total"], 3);
        assert_eq!(json["thisWeek"], 3);
    }

    #[tokio::test]
    async fn test_catalog() {
        let app = make_app();
        let resp = app.oneshot(get_req("/api/v1/catalog")).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["emotions"].as_array().unwrap().len(), 7);
        assert_eq!(json["quickTags"][0], "Personal");
        assert_eq!(json["maxContentChars"], 500);
    }

    #[tokio::test]
    async fn test_persists_to_file_slot() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::named(dir.path(), "echovault-memories");
        let state = MemoriesState::new(MemoryStore::open_with(
            Box::new(slot.clone()),
            JournalConfig::default(),
        ));
        let app = memories_router(state);

        let resp = app
            .oneshot(post_json(
                "/api/v1/memories",
                serde_json::json!({ "content": "Written to disk" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let reloaded = MemoryStore::open(slot);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.records()[0].content, "Written to disk");
    }
}
