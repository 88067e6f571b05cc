//! Application setup and router configuration.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    files_handler, generate_handler, health_handler, progress_handler, status_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router.
///
/// Generated artifacts under `output_dir` are served statically at
/// `/output`, matching the paths the files endpoint hands out.
pub fn build_app(deps: Arc<ServerDeps>, output_dir: &Path) -> Router {
    let state = AppState { deps };

    // CORS: the web UI may be served from anywhere during development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/status/:job_id", get(status_handler))
        .route("/api/files/:job_id", get(files_handler))
        .route("/api/progress/:job_id", get(progress_handler))
        .route("/health", get(health_handler))
        .nest_service("/output", ServeDir::new(output_dir))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
