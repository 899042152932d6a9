use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storage_ref::{StorageRef, StorageRefError};

/// A video record as held by the metadata store.
///
/// `video_url` and `thumbnail_url` hold stable `{bucket},{key}` references,
/// never signed URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    pub fn new(user_id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: description.into(),
            video_url: None,
            thumbnail_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Parsed video reference, `None` when nothing has been uploaded yet.
    pub fn video_ref(&self) -> Result<Option<StorageRef>, StorageRefError> {
        self.video_url.as_deref().map(str::parse).transpose()
    }

    pub fn thumbnail_ref(&self) -> Result<Option<StorageRef>, StorageRefError> {
        self.thumbnail_url.as_deref().map(str::parse).transpose()
    }
}

/// Client view of a record. URL fields carry freshly signed URLs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    pub fn from_record(
        record: VideoRecord,
        video_url: Option<String>,
        thumbnail_url: Option<String>,
    ) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            description: record.description,
            video_url,
            thumbnail_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
