//! HTTP endpoints: thin wrappers with no logic of their own —
//! each handler just validates the transport concerns (JSON shape) and
//! hands off to the [`Orchestrator`].

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use thai_search_core::{BatchSearchRequest, SearchRequest, SearchResponse};

use crate::error::ApiError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/search", post(search))
        .route("/v1/search/batch", post(batch_search))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let response = state.orchestrator.search(request).await?;
    Ok(Json(response))
}

async fn batch_search(
    State(state): State<AppState>,
    Json(request): Json<BatchSearchRequest>,
) -> Result<Json<Vec<SearchResponse>>, ApiError> {
    let responses = state.orchestrator.batch_search(request).await?;
    Ok(Json(responses))
}

async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
