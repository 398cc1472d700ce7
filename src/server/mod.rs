// src/server/mod.rs
// =============================================================================
// HTTP front door for the analysis pipeline.
//
// Routes:
//   POST /analyze-repo   { "repoUrl": "..." } -> AnalysisResult
//   POST /               same as above
//   GET  /health         liveness probe
//
// Browsers call this API from other origins, so every response carries
// permissive CORS headers and every OPTIONS request is answered with an
// empty 200.
// =============================================================================

mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, Method},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::analysis::{analyze_repo, AnalysisResult};
use crate::github::RepoSource;

pub use error::ApiError;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RepoSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn RepoSource>) -> Self {
        Self { source }
    }
}

/// Body of POST /analyze-repo
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "repoUrl", default)]
    pub repo_url: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(analyze))
        .route("/analyze-repo", post(analyze))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

/// Binds `addr` and serves until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "codeunbox listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

// The body is parsed by hand rather than with the Json extractor so that a
// malformed body gets the same {"error": ...} shape as every other failure.
async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, ApiError> {
    let request: AnalyzeRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::internal(e.to_string()))?;

    let repo_url = request
        .repo_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::bad_request("Repository URL is required"))?;

    info!(repo_url = %repo_url, "analyzing repository");

    match analyze_repo(state.source.as_ref(), &repo_url).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!(repo_url = %repo_url, error = %e, "analysis failed");
            Err(e.into())
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
