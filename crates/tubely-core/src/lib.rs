//! Tubely Core Library
//!
//! Domain models, error types, configuration and the storage reference type
//! shared by every Tubely crate.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_ref;
pub mod storage_types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Orientation, VideoRecord, VideoResponse};
pub use storage_ref::{StorageRef, StorageRefError};
pub use storage_types::StorageBackend;
