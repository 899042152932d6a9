use super::admission::{admit_thumbnail_type, admit_video_type};
use super::staging::{stage_field, StagedUpload};
use crate::error::multipart_error;
use crate::services::{signing, videos};
use axum::extract::Multipart;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_core::constants::{
    ALLOWED_THUMBNAIL_TYPES, ALLOWED_VIDEO_TYPES, THUMBNAIL_FORM_FIELD, VIDEO_FORM_FIELD,
};
use tubely_core::{AppError, VideoRecord, VideoResponse};
use tubely_db::VideoStore;
use tubely_processing::{FastStartTransformer, MediaIntrospector};
use tubely_storage::{keys, Storage};
use uuid::Uuid;

const VIDEO_EXTENSION: &str = "mp4";

/// Size ceilings and the staging directory for uploads.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub temp_dir: PathBuf,
    pub max_video_bytes: usize,
    pub max_thumbnail_bytes: usize,
}

/// Upload pipeline over the metadata store, object store and media tools.
#[derive(Clone)]
pub struct VideoUploadService {
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    introspector: Arc<dyn MediaIntrospector>,
    transformer: Arc<dyn FastStartTransformer>,
    limits: UploadLimits,
}

impl VideoUploadService {
    pub fn new(
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        introspector: Arc<dyn MediaIntrospector>,
        transformer: Arc<dyn FastStartTransformer>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            videos,
            storage,
            introspector,
            transformer,
            limits,
        }
    }

    /// Load the target record and check the caller owns it.
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<VideoRecord, AppError> {
        videos::load_owned(self.videos.as_ref(), video_id, user_id).await
    }

    /// Admit and stage the `video` field, then run the rest of the pipeline.
    ///
    /// Everything after staging runs on its own task, so dropping this future
    /// (client disconnect) does not interrupt the media tools or the placement.
    pub async fn upload_video(
        &self,
        record: VideoRecord,
        mut multipart: Multipart,
    ) -> Result<VideoResponse, AppError> {
        let (staged, content_type) = self.admit_and_stage(&mut multipart).await?;

        tracing::info!(
            video_id = %record.id,
            size_bytes = staged.size(),
            content_type = %content_type,
            "Video staged, processing"
        );

        let this = self.clone();
        tokio::spawn(async move { this.process_staged(record, staged, content_type).await })
            .await
            .map_err(|e| AppError::Internal(format!("Upload task failed: {}", e)))?
    }

    async fn admit_and_stage(
        &self,
        multipart: &mut Multipart,
    ) -> Result<(StagedUpload, String), AppError> {
        while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(VIDEO_FORM_FIELD) {
                continue;
            }
            let content_type = admit_video_type(field.content_type(), ALLOWED_VIDEO_TYPES)?;
            let staged = stage_field(
                &mut field,
                &self.limits.temp_dir,
                self.limits.max_video_bytes,
            )
            .await?;
            return Ok((staged, content_type));
        }

        Err(AppError::BadRequest(format!(
            "Missing '{}' field in multipart form",
            VIDEO_FORM_FIELD
        )))
    }

    /// classify → derive key → transform → place → persist → respond
    #[tracing::instrument(skip_all, fields(video_id = %record.id))]
    async fn process_staged(
        &self,
        mut record: VideoRecord,
        staged: StagedUpload,
        content_type: String,
    ) -> Result<VideoResponse, AppError> {
        let start = std::time::Instant::now();

        let stream = self.introspector.introspect(staged.path()).await?;
        let orientation = stream.orientation();
        let key = keys::video_key(orientation, VIDEO_EXTENSION);
        tracing::debug!(
            width = stream.width,
            height = stream.height,
            orientation = %orientation,
            key = %key,
            "Video classified"
        );

        let processed = self.transformer.remux(staged.path()).await?;
        let file = tokio::fs::File::open(processed.path()).await.map_err(|e| {
            AppError::TransformFailed(format!("Failed to open remuxed file: {}", e))
        })?;

        let reference = self.storage.put_file(&key, &content_type, file).await?;

        record.video_url = Some(reference.to_string());
        let updated = self.videos.update_video(&record).await.map_err(|e| {
            tracing::error!(
                error = %e,
                reference = %reference,
                "Video record update failed, stored object is orphaned"
            );
            AppError::PersistFailed(e.to_string())
        })?;

        tracing::info!(
            reference = %reference,
            duration_ms = start.elapsed().as_millis(),
            "Video upload completed"
        );

        signing::sign_record(self.storage.as_ref(), updated).await
    }

    /// Store a thumbnail image and record its reference.
    pub async fn upload_thumbnail(
        &self,
        mut record: VideoRecord,
        mut multipart: Multipart,
    ) -> Result<VideoResponse, AppError> {
        let (data, content_type, ext) = loop {
            let Some(field) = multipart.next_field().await.map_err(multipart_error)? else {
                return Err(AppError::BadRequest(format!(
                    "Missing '{}' field in multipart form",
                    THUMBNAIL_FORM_FIELD
                )));
            };
            if field.name() != Some(THUMBNAIL_FORM_FIELD) {
                continue;
            }
            let (content_type, ext) =
                admit_thumbnail_type(field.content_type(), ALLOWED_THUMBNAIL_TYPES)?;
            let data = field.bytes().await.map_err(multipart_error)?;
            break (data, content_type, ext);
        };

        if data.is_empty() {
            return Err(AppError::BadRequest("Thumbnail is empty".to_string()));
        }
        if data.len() > self.limits.max_thumbnail_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Thumbnail exceeds maximum size of {} MB",
                self.limits.max_thumbnail_bytes / 1024 / 1024
            )));
        }

        let key = keys::thumbnail_key(ext);
        let reference = self.storage.put_bytes(&key, &content_type, data).await?;

        record.thumbnail_url = Some(reference.to_string());
        let updated = self.videos.update_video(&record).await.map_err(|e| {
            tracing::error!(error = %e, reference = %reference, "Thumbnail record update failed");
            AppError::PersistFailed(e.to_string())
        })?;

        tracing::info!(video_id = %updated.id, reference = %reference, "Thumbnail stored");

        signing::sign_record(self.storage.as_ref(), updated).await
    }
}
