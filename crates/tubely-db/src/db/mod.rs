//! Video record repositories.
//!
//! `PgVideoRepository` is the production store. `InMemoryVideoStore` keeps
//! records for the lifetime of the process and backs tests and local
//! development without a database.

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoStore;
pub use video::{migrate, PgVideoRepository};

use async_trait::async_trait;
use tubely_core::{AppError, VideoRecord};
use uuid::Uuid;

#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn create_video(&self, record: &VideoRecord) -> Result<(), AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Replace the mutable fields of an existing record.
    ///
    /// Fails with `NotFound` when the record no longer exists.
    async fn update_video(&self, record: &VideoRecord) -> Result<VideoRecord, AppError>;

    /// Records owned by `user_id`, newest first.
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError>;
}
