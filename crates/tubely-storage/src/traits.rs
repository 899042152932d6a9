//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::{StorageBackend, StorageRef};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => AppError::PlacementFailed(msg),
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::AccessDenied(msg) => AppError::Forbidden(msg),
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::SigningFailed(msg)
            | StorageError::BackendError(msg)
            | StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Storage abstraction trait
///
/// Every write returns the [`StorageRef`] it was placed under, which is what
/// gets persisted. Reads go through [`Storage::signed_get_url`] and are always
/// derived from a reference, never cached.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bucket new objects are written to.
    fn bucket(&self) -> &str;

    /// Transfer an open local file (positioned at its start) to `key`.
    ///
    /// Either the whole object becomes visible under `key` or the call fails.
    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        file: tokio::fs::File,
    ) -> StorageResult<StorageRef>;

    /// Store a small in-memory payload under `key`.
    async fn put_bytes(&self, key: &str, content_type: &str, data: Bytes)
        -> StorageResult<StorageRef>;

    /// Time-limited GET URL for the referenced object.
    ///
    /// Uses the bucket named in the reference, which need not be
    /// [`Storage::bucket`].
    async fn signed_get_url(
        &self,
        reference: &StorageRef,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
