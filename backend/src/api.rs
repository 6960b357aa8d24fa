//! HTTP trigger for fetch runs

use crate::ingestion::pipeline::Pipeline;
use crate::ingestion::RunStatus;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}

#[derive(Serialize)]
struct ApiResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct FetchResponse {
    status: RunStatus,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/api/health", get(health_check))
        .route("/fetch/:api_key", get(run_fetch))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "WRIS fetch API is running!".to_string(),
        status: "ok".to_string(),
    })
}

/// Runs the whole fetch before answering; the caller waits for every district
async fn run_fetch(
    State(state): State<AppState>,
    Path(api_key): Path<String>,
) -> Result<Json<FetchResponse>, StatusCode> {
    info!("Fetch requested for {}", api_key);

    let report = state.pipeline.run(&api_key).await.map_err(|e| {
        error!("Fetch run for {} failed: {:#}", api_key, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(FetchResponse {
        status: report.status,
    }))
}
