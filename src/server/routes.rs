// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    download_handler, edit_handler, health_handler, metrics_handler, original_handler,
    reset_handler, result_handler, session_handler, upload_handler,
};
use super::middleware::{request_id_layers, track_requests};
use crate::config::AppConfig;
use crate::error::Result;
use crate::session::SessionController;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Slack on top of the upload limit so oversized files still reach the
/// codec and get its error message.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub controller: SessionController,
}

pub fn create_router(config: AppConfig, controller: SessionController) -> Result<Router> {
    let body_limit = config.limits.max_upload_bytes + BODY_LIMIT_SLACK;
    let state = AppState { config, controller };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/session", get(session_handler))
        .route("/api/session/image", put(upload_handler))
        .route("/api/session/edit", post(edit_handler))
        .route("/api/session/reset", post(reset_handler))
        .route("/api/session/original", get(original_handler))
        .route("/api/session/result", get(result_handler))
        .route("/api/session/result/download", get(download_handler))
        .route_layer(middleware::from_fn(track_requests))
        // Raw image uploads exceed axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(tower_http::limit::RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
