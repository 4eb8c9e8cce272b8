//! src/services/storage_service.rs
//!
//! StorageService: the single storage directory behind the upload server.
//! Uploads are written flat under `base_path/{millis}-{original_name}`; there
//! is no metadata store, so the directory contents are the only state.

use crate::models::stored_file::StoredFile;
use bytes::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt, pin_mut};
use std::{
    fs as std_fs, io,
    path::PathBuf,
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::{debug, info};

/// Public path prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage path `{0}` exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// StorageService owns the storage root and derives public paths:
/// - Ensure the directory exists (startup)
/// - Store one uploaded stream under a timestamped name
/// - List the directory entries
///
/// Cloned into every handler as router state.
#[derive(Clone, Debug)]
pub struct StorageService {
    /// Directory on disk where uploaded files are stored.
    pub base_path: PathBuf,

    /// Prefix joined with a file name to form its public path.
    pub public_prefix: String,
}

impl StorageService {
    /// Create a StorageService rooted at `base_path`, serving under `/uploads`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            public_prefix: PUBLIC_PREFIX.to_string(),
        }
    }

    /// Create the storage directory if it does not exist yet.
    ///
    /// Single-level create: a missing parent is an error. Calling this on an
    /// existing directory is a no-op.
    pub fn ensure_directory(&self) -> StorageResult<()> {
        let path = &self.base_path;
        if path.exists() {
            if !path.is_dir() {
                return Err(StorageError::NotADirectory(path.clone()));
            }
            debug!("Storage directory {} already exists", path.display());
            return Ok(());
        }

        std_fs::create_dir(path)?;
        info!("Created storage directory at {}", path.display());
        Ok(())
    }

    /// Public access path for a stored file name.
    pub fn public_path(&self, name: &str) -> String {
        format!("{}/{}", self.public_prefix, name)
    }

    /// Stream an upload to disk under a freshly assigned name.
    ///
    /// The file is created (or truncated, on a same-millisecond name
    /// collision) directly at its final location. On a stream or write error
    /// the partial file is removed before the error is returned.
    pub async fn store_stream<S>(&self, original_name: &str, stream: S) -> StorageResult<StoredFile>
    where
        S: Stream<Item = io::Result<Bytes>>,
    {
        let name = stored_name(Utc::now().timestamp_millis(), original_name);
        self.write_stream(name, stream).await
    }

    /// Write `stream` to `base_path/name`, truncating any existing file.
    async fn write_stream<S>(&self, name: String, stream: S) -> StorageResult<StoredFile>
    where
        S: Stream<Item = io::Result<Bytes>>,
    {
        let file_path = self.base_path.join(&name);
        let mut file = File::create(&file_path).await?;

        let mut size_bytes: u64 = 0;
        pin_mut!(stream);
        while let Some(chunk_res) = stream.next().await {
            let chunk = match chunk_res {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = fs::remove_file(&file_path).await;
                    return Err(StorageError::Io(err));
                }
            };
            size_bytes += chunk.len() as u64;
            if let Err(err) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&file_path).await;
                return Err(StorageError::Io(err));
            }
        }
        if let Err(err) = file.flush().await {
            let _ = fs::remove_file(&file_path).await;
            return Err(StorageError::Io(err));
        }

        info!(filename = %name, size_bytes, "Stored upload");
        Ok(StoredFile {
            path: self.public_path(&name),
            filename: name,
        })
    }

    /// List every entry in the storage directory.
    ///
    /// Order is whatever the directory enumeration yields. Entries are not
    /// filtered by type.
    pub async fn list_files(&self) -> StorageResult<Vec<StoredFile>> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(StoredFile {
                path: self.public_path(&name),
                filename: name,
            });
        }
        debug!("Listed {} stored files", files.len());
        Ok(files)
    }

    /// Check the storage directory can be enumerated, without touching its contents.
    pub async fn check_readable(&self) -> StorageResult<()> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        entries.next_entry().await?;
        Ok(())
    }
}

/// On-disk name for an upload: `{millis}-{basename}`.
pub fn stored_name(epoch_millis: i64, original_name: &str) -> String {
    format!("{}-{}", epoch_millis, original_basename(original_name))
}

/// Final path component of a client-supplied file name.
///
/// Drops everything up to the last `/` or `\`; `.` and `..` reduce to the
/// empty string. No other characters are touched.
pub fn original_basename(original_name: &str) -> &str {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    if base == "." || base == ".." { "" } else { base }
}
