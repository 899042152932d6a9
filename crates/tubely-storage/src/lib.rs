//! Tubely Storage Library
//!
//! Object placement and signed read access for the S3 and local filesystem
//! backends.
//!
//! # Storage key format
//!
//! Video keys are `{orientation}/{token}.{ext}` and thumbnail keys are
//! `thumbnails/{token}.{ext}`, where `token` is 32 random bytes encoded as
//! unpadded URL-safe base64. Key generation lives in the `keys` module so every
//! backend sees the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use factory::{create_storage, ConfiguredStorage};
#[cfg(feature = "storage-local")]
pub use local::{LocalObject, LocalStorage};
#[cfg(feature = "storage-s3")]
pub use s3::{S3Settings, S3Storage};
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::{StorageBackend, StorageRef};
