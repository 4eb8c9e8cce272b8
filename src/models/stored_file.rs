//! Represents a file persisted in the storage directory.

use serde::{Deserialize, Serialize};

/// A single stored file, addressed by its on-disk name.
///
/// The name is assigned once at upload time and never changes; the `path`
/// is the public locator under which its bytes are served.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Name of the file inside the storage directory.
    pub filename: String,

    /// Public access path (`/uploads/{filename}`).
    pub path: String,
}

/// Body returned by `POST /upload`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UploadResponse {
    pub message: String,
    #[serde(flatten)]
    pub file: StoredFile,
}

impl UploadResponse {
    pub fn success(file: StoredFile) -> Self {
        Self {
            message: "File uploaded successfully".into(),
            file,
        }
    }
}
