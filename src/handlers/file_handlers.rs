//! HTTP handlers for uploading and listing stored files.
//! Upload bodies are streamed straight to disk; all filesystem access goes
//! through `StorageService`.

use crate::{
    errors::AppError,
    models::stored_file::{StoredFile, UploadResponse},
    services::storage_service::{StorageService, original_basename},
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use futures::StreamExt;
use std::io;
use tracing::{debug, error, warn};

/// Multipart field that carries the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

const NO_FILE_UPLOADED: &str = "No file uploaded";
const UNEXPECTED_FIELD: &str = "Unexpected field";
const UPLOAD_FAILED: &str = "Error uploading file";
const LIST_FAILED: &str = "Error reading files";

/// `POST /upload`: store the first file part sent under `file`.
///
/// Text parts, and file parts whose name reduces to nothing, are skipped.
/// A file part under any other field name rejects the request before
/// anything is written.
pub async fn upload_file(
    State(service): State<StorageService>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|err| {
        debug!("Upload without multipart body: {}", err);
        AppError::bad_request(NO_FILE_UPLOADED)
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        warn!("Failed to parse multipart body: {}", err);
        AppError::bad_request(NO_FILE_UPLOADED)
    })? {
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        // An empty basename (`""`, `.`, `..`, `dir/`) is not a file.
        if original_basename(&original_name).is_empty() {
            debug!(field = ?field.name(), "Skipping part with empty file name");
            continue;
        }
        if field.name() != Some(UPLOAD_FIELD) {
            warn!(field = ?field.name(), "Rejecting file sent under unexpected field");
            return Err(AppError::bad_request(UNEXPECTED_FIELD));
        }

        let stream = field.map(|chunk| chunk.map_err(io::Error::other));
        let stored = service
            .store_stream(&original_name, stream)
            .await
            .map_err(|err| {
                error!("Failed to store upload `{}`: {}", original_name, err);
                AppError::internal(UPLOAD_FAILED)
            })?;

        return Ok(Json(UploadResponse::success(stored)));
    }

    Err(AppError::bad_request(NO_FILE_UPLOADED))
}

/// `GET /files`: every entry in the storage directory.
pub async fn list_files(
    State(service): State<StorageService>,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    let files = service.list_files().await.map_err(|err| {
        error!(
            "Failed to read storage directory {}: {}",
            service.base_path.display(),
            err
        );
        AppError::internal(LIST_FAILED)
    })?;

    Ok(Json(files))
}
