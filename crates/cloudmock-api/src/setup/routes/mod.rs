//! Route configuration and setup.
//!
//! The upload route and the static layer for stored files live here; health
//! checks in [health](health).

mod health;

use crate::constants::{HEALTH_ROUTE, MULTIPART_OVERHEAD_BYTES, READINESS_ROUTE, UPLOAD_ROUTE};
use crate::handlers;
use crate::middleware::{request_id_middleware, RequestId};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use cloudmock_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // The ceiling itself is enforced per part while streaming; the body limit only
    // has to stop requests that are larger than any acceptable upload could be.
    let body_limit = usize::try_from(config.max_file_size_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let mut app = Router::new()
        .route(UPLOAD_ROUTE, post(handlers::image_upload::upload_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .route(HEALTH_ROUTE, get(health::liveness_check))
        .route(READINESS_ROUTE, get(health::readiness_check))
        .with_state(state);

    if config.serve_uploads() {
        app = mount_uploads(app, config);
    }

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let app = app
        .layer(cors)
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

/// Serve stored files at the path component of the public base URL, so the
/// returned `url` resolves against this process.
fn mount_uploads(app: Router, config: &Config) -> Router {
    let public_path = config.public_path();
    let serve_dir = Router::new()
        .fallback_service(ServeDir::new(config.upload_dir()))
        .layer(axum::middleware::from_fn(hide_dot_paths));

    tracing::info!(
        public_path = %public_path,
        upload_dir = %config.upload_dir().display(),
        "Serving stored uploads"
    );

    if public_path.is_empty() {
        app.fallback_service(serve_dir)
    } else {
        app.nest_service(&public_path, serve_dir)
    }
}

/// Generated names never start with a dot; dot segments are the staging area.
async fn hide_dot_paths(request: Request<Body>, next: Next) -> Response {
    let hidden = request.uri().path().split('/').any(|segment| {
        segment.starts_with('.') || segment.to_ascii_lowercase().starts_with("%2e")
    });
    if hidden {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
