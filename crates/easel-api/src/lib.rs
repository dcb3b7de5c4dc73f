//! # easel-api
//!
//! HTTP API server for easel: artwork critique and student page publishing.
//!
//! The binary in `main.rs` builds an [`AppState`] from environment
//! configuration and serves the router from [`build_router`]. Tests build
//! the same router around mock backends.

pub mod handlers;
pub mod uploads;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::{Config, SwaggerUi};
use uuid::Uuid;

use easel_core::{defaults, AppConfig};
use easel_hosting::{Deployer, HostingApiClient};
use easel_inference::CritiqueBackend;

use crate::uploads::UploadStore;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation and debugging.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Artwork critique backend.
    pub critique: Arc<dyn CritiqueBackend>,
    /// Deploy runner for the generated site.
    pub deployer: Arc<dyn Deployer>,
    /// Hosting API client. `None` disables preview URL lookup.
    pub hosting_api: Option<Arc<HostingApiClient>>,
    /// Transient upload store.
    pub uploads: UploadStore,
}

/// OpenAPI documentation (utoipa metadata, used for Swagger UI configuration).
///
/// The OpenAPI spec is maintained in `openapi.yaml` and served at
/// `/openapi.yaml`. Swagger UI at `/docs` fetches from that endpoint.
#[allow(dead_code)]
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Easel API",
        version = "2026.8.1",
        description = "Artwork critique and student page publishing for art classrooms"
    ),
    tags(
        (name = "Analysis", description = "Artwork upload and critique"),
        (name = "Publishing", description = "Student page generation and deployment"),
        (name = "System", description = "Health checks")
    )
)]
struct ApiDoc;

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// API-boundary error, converted to a JSON body at the edge.
///
/// The analyze and deploy paths answer with a generic message plus details,
/// which is what the generated page script expects.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Inference(String),
    Deployment(String),
    Internal(String),
}

impl From<easel_core::Error> for ApiError {
    fn from(err: easel_core::Error) -> Self {
        match err {
            easel_core::Error::Validation(msg) => ApiError::BadRequest(msg),
            easel_core::Error::Inference(msg) => ApiError::Inference(msg),
            easel_core::Error::Deployment(msg) | easel_core::Error::Template(msg) => {
                ApiError::Deployment(msg)
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::Inference(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "Error analyzing image", "details": details }),
            ),
            ApiError::Deployment(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "Error deploying application", "details": details }),
            ),
            ApiError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "Internal server error", "details": details }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// CORS CONFIGURATION HELPER
// =============================================================================

/// Parse allowed origins from the comma-separated `ALLOWED_ORIGINS`
/// environment variable.
///
/// Enforces strict origin whitelisting for CORS. Defaults to the local dev
/// origin when unset.
pub fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str =
        std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    if origins_str.trim().is_empty() {
        return vec![HeaderValue::from_static("http://localhost:3000")];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.intake.max_upload_bytes + defaults::MULTIPART_OVERHEAD_BYTES;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // OpenAPI / Swagger UI
        .merge(
            SwaggerUi::new("/docs").config(
                Config::new(["/openapi.yaml"])
                    .try_it_out_enabled(true)
                    .filter(true)
                    .display_request_duration(true),
            ),
        )
        .route("/openapi.yaml", get(openapi_yaml))
        // Teacher console entry page
        .route("/", get(index))
        // Artwork critique
        .route("/analyze", post(handlers::analyze::analyze_artwork))
        // Student page publishing
        .route("/create-app", post(handlers::create_app::create_app))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(defaults::CORS_MAX_AGE_SECS))
        })
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

// =============================================================================
// SYSTEM HANDLERS
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve the teacher console entry page.
async fn index() -> impl IntoResponse {
    Html(include_str!("../static/index.html"))
}

/// Serve OpenAPI YAML spec
async fn openapi_yaml() -> impl IntoResponse {
    const SPEC: &str = include_str!("openapi.yaml");
    ([(header::CONTENT_TYPE, "application/yaml")], SPEC)
}
