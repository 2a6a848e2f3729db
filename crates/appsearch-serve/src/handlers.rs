//! HTTP handlers for the REST API

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use appsearch_core::types::{CatalogEntry, QueryRequest, ScoredResult};
use appsearch_hybrid::SearchContext;

use crate::error::{ApiError, ApiResult};

/// State shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<SearchContext>,
    /// Store re-read by `POST /api/reload`.
    pub store_path: PathBuf,
}

impl AppState {
    pub fn new(context: Arc<SearchContext>, store_path: impl Into<PathBuf>) -> Self {
        Self { context, store_path: store_path.into() }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub query: Option<String>,
    /// Non-positive values ask for a single result.
    #[serde(default)]
    pub top_k: Option<i64>,
}

impl SearchBody {
    /// A missing or empty `query` is a validation error.
    pub fn into_request(self) -> ApiResult<QueryRequest> {
        let query = self.query.unwrap_or_default();
        if query.is_empty() {
            return Err(ApiError::validation("Query is required"));
        }
        let top_k = self.top_k.map(|k| usize::try_from(k.max(1)).unwrap_or(usize::MAX));
        Ok(QueryRequest { query, top_k })
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ScoredResult>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct AppsResponse {
    pub apps: Vec<CatalogEntry>,
    pub total: usize,
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/apps", get(list_apps))
        .route("/api/search", post(search))
        .route("/api/reload", post(reload))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let engine = state.context.snapshot();
    Json(json!({
        "status": "ok",
        "apps": engine.len(),
        "model": engine.embedder().model_id(),
    }))
}

/// GET /api/apps - every entry the index serves
pub async fn list_apps(State(state): State<AppState>) -> Json<AppsResponse> {
    let apps = state.context.snapshot().entries().to_vec();
    Json(AppsResponse { total: apps.len(), apps })
}

/// POST /api/search
pub async fn search(
    State(state): State<AppState>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(body) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected search body");
        ApiError::validation("Invalid request body")
    })?;
    let request = body.into_request()?;
    info!(query = %request.query, top_k = ?request.top_k, "search");

    let engine = state.context.snapshot();
    let (request, results) = tokio::task::spawn_blocking(move || {
        let results = engine.run(&request);
        (request, results)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "search task panicked");
        ApiError::internal()
    })?;
    let results = results?;

    Ok(Json(SearchResponse { query: request.query, total: results.len(), results }))
}

/// POST /api/reload - swap in a fresh snapshot of the store file
pub async fn reload(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let context = Arc::clone(&state.context);
    let path = state.store_path.clone();
    let report = tokio::task::spawn_blocking(move || context.reload_from(&path))
        .await
        .map_err(|e| {
            error!(error = %e, "reload task panicked");
            ApiError::internal()
        })??;
    Ok(Json(json!({ "status": "reloaded", "report": report })))
}
