pub mod handlers;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Uploads above this size are rejected before the handler runs.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/upload", post(handlers::handle_upload))
        .route("/api/create-cv", post(handlers::handle_create))
        .route("/api/improve", post(handlers::handle_improve))
        .route("/download/:filename", get(handlers::handle_download))
        .route("/preview/:filename", get(handlers::handle_preview))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
