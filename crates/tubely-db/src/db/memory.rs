use super::VideoStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tubely_core::{AppError, VideoRecord};
use uuid::Uuid;

/// Process-lifetime store. Nothing is ever evicted.
#[derive(Default)]
pub struct InMemoryVideoStore {
    videos: RwLock<HashMap<Uuid, VideoRecord>>,
}

impl InMemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn create_video(&self, record: &VideoRecord) -> Result<(), AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&record.id) {
            return Err(AppError::BadRequest(format!(
                "Video {} already exists",
                record.id
            )));
        }
        videos.insert(record.id, record.clone());
        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, record: &VideoRecord) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.write().await;
        let existing = videos
            .get_mut(&record.id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", record.id)))?;

        existing.title = record.title.clone();
        existing.description = record.description.clone();
        existing.video_url = record.video_url.clone();
        existing.thumbnail_url = record.thumbnail_url.clone();
        existing.updated_at = Utc::now();

        Ok(existing.clone())
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        let mut videos: Vec<VideoRecord> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }
}
