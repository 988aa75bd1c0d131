use crate::pipeline::PipelineOrchestrator;
use crate::types::{Inference, PipelineError, Result, UpdateReport};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared by the HTTP handlers and the daily trigger.
pub struct AppState {
    orchestrator: PipelineOrchestrator,
    // update and inference both touch the artifacts; run one at a time
    artifacts: Mutex<()>,
}

impl AppState {
    pub fn new(orchestrator: PipelineOrchestrator) -> Self {
        Self {
            orchestrator,
            artifacts: Mutex::new(()),
        }
    }

    pub async fn run_update(&self) -> Result<UpdateReport> {
        let _guard = self.artifacts.lock().await;
        self.orchestrator.update().await
    }

    pub async fn run_inference(&self) -> Result<Inference> {
        let _guard = self.artifacts.lock().await;
        self.orchestrator.inference().await
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/inference", get(inference))
        .route("/update", get(update))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn inference(State(state): State<Arc<AppState>>) -> Response {
    match state.run_inference().await {
        Ok(Inference::Likelihood(likelihood)) => (StatusCode::OK, likelihood.to_string()).into_response(),
        Ok(Inference::Unavailable) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to generate inference" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

async fn update(State(state): State<Arc<AppState>>) -> Response {
    match state.run_update().await {
        Ok(report) => {
            info!("Update via HTTP trained on {} rows", report.rows_built);
            (StatusCode::OK, "0").into_response()
        }
        Err(e) => error_response(e),
    }
}

fn error_response(e: PipelineError) -> Response {
    error!("Request failed ({}): {}", e.kind(), e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string(), "kind": e.kind() })),
    )
        .into_response()
}
