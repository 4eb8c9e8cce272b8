//! Defines the upload server's HTTP surface.
//!
//! ## Structure
//! - `POST /upload`         store one multipart file
//! - `GET  /files`          list stored files
//! - `GET  /uploads/{name}` raw bytes of a stored file (static serving)
//! - `GET  /healthz`, `GET /readyz` probes
//!
//! CORS is permissive on every route; the request body limit is disabled.

use crate::{
    handlers::{
        file_handlers::{list_files, upload_file},
        health_handlers::{healthz, readyz},
    },
    services::storage_service::StorageService,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Build the router for all upload-server routes.
///
/// Handler routes share a `Router<StorageService>`; the static `/uploads`
/// service is rooted at the same directory the handlers write to.
pub fn routes() -> Router<StorageService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/upload", post(upload_file))
        .route("/files", get(list_files))
}

/// Fully assembled application with state, static serving and middleware.
pub fn app(storage: StorageService) -> Router {
    let uploads = ServeDir::new(&storage.base_path);

    routes()
        .nest_service(&storage.public_prefix, uploads)
        .layer(DefaultBodyLimit::disable())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(storage)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
