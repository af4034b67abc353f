//! Storage abstraction trait
//!
//! Defines the contract every storage backend must implement. Keys are
//! opaque strings assigned by the upload pipeline; backends never derive
//! keys from client input.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All backends (S3-compatible in production, in-memory in tests) implement
/// this so the document pipeline works against any of them.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data under a caller-assigned storage key.
    async fn upload_with_key(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Download an object by its storage key.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by its storage key.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Generate a presigned/temporary URL for direct GET access.
    ///
    /// Fails when the backend cannot produce one, e.g. the object was
    /// deleted after an infected verdict.
    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;
}
