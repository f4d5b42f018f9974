//! REST API Server for the job search service
//!
//! Exposes the search orchestrator via HTTP endpoints
//! and serves the browser client

use axum::{
    error_handling::HandleErrorLayer,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    BoxError, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::config::REQUEST_TIMEOUT;
use crate::search::SearchOrchestrator;

const RATE_LIMITED_MESSAGE: &str =
    "Rate limited by Anthropic API. Please wait a minute and try again.";

const INDEX_HTML: &str = include_str!("../static/index.html");

/// =============================
/// Response Models
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn respond(status: StatusCode, error: String) -> Response {
        (status, Json(Self { error })).into_response()
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<SearchOrchestrator>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// =============================
/// Search Endpoint
/// =============================

async fn search_jobs(State(state): State<ApiState>) -> Response {
    let today = chrono::Utc::now().date_naive();
    info!("Received job search request for {}", today);

    match state.orchestrator.search(today).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) if e.is_rate_limited() => ErrorResponse::respond(
            StatusCode::TOO_MANY_REQUESTS,
            RATE_LIMITED_MESSAGE.to_string(),
        ),
        Err(e) => ErrorResponse::respond(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Converts middleware failures into the `{ error }` body the client reads.
async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        error!("Job search exceeded {}s ceiling", REQUEST_TIMEOUT.as_secs());
        return ErrorResponse::respond(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Search timed out after {} seconds", REQUEST_TIMEOUT.as_secs()),
        );
    }

    ErrorResponse::respond(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<SearchOrchestrator>) -> Router {
    let state = ApiState { orchestrator };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/search-jobs", post(search_jobs))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(REQUEST_TIMEOUT),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<SearchOrchestrator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
