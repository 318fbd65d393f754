//! Axum-based HTTP server implementation for the editor.
//!
//! This module exposes the edit session to a browser front end: image
//! upload, prompt submission, reset, and retrieval of the original and
//! edited images.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual API endpoints (session, edit, health, metrics).
//! - `middleware`: Request ID tracking and request metrics.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{EditBody, EditResult, HealthResponse, ImageView, FILE_NAME_HEADER};
pub use routes::{create_router, AppState};
