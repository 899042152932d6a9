use super::VideoStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tubely_core::{AppError, VideoRecord};
use uuid::Uuid;

/// Apply the embedded migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Repository for video records
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoRepository {
    async fn create_video(&self, record: &VideoRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, user_id, title, description, video_url, thumbnail_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.video_url)
        .bind(&record.thumbnail_url)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let row = sqlx::query_as::<_, VideoRecord>(
            r#"
            SELECT id, user_id, title, description, video_url, thumbnail_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_video(&self, record: &VideoRecord) -> Result<VideoRecord, AppError> {
        let row = sqlx::query_as::<_, VideoRecord>(
            r#"
            UPDATE videos
            SET title = $2, description = $3, video_url = $4, thumbnail_url = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, user_id, title, description, video_url, thumbnail_url, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.video_url)
        .bind(&record.thumbnail_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        let updated = row.ok_or_else(|| AppError::NotFound(format!("Video {} not found", record.id)))?;

        tracing::debug!(video_id = %updated.id, "Video record updated");

        Ok(updated)
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        let rows = sqlx::query_as::<_, VideoRecord>(
            r#"
            SELECT id, user_id, title, description, video_url, thumbnail_url, created_at, updated_at
            FROM videos
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
