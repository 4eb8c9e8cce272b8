//! Single-file upload server: stores one multipart file per request under a
//! timestamped name, lists the storage directory and serves files back.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes::app;
pub use services::storage_service::StorageService;
