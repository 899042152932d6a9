use tubely_core::{AppError, VideoRecord};
use tubely_db::VideoStore;
use uuid::Uuid;

/// Fetch a record and check that `user_id` owns it.
pub async fn load_owned(
    store: &dyn VideoStore,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<VideoRecord, AppError> {
    let record = store
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if !record.is_owned_by(user_id) {
        tracing::warn!(video_id = %video_id, user_id = %user_id, "Access to video denied");
        return Err(AppError::Forbidden(
            "Not authorized to access this video".to_string(),
        ));
    }

    Ok(record)
}
