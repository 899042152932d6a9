//! Resolve stored references to client-facing signed URLs.

use tubely_core::constants::SIGNED_URL_TTL;
use tubely_core::{AppError, StorageRef, VideoRecord, VideoResponse};
use tubely_storage::Storage;

/// Signed GET URL for `reference`, valid for [`SIGNED_URL_TTL`].
pub async fn resolve(storage: &dyn Storage, reference: &StorageRef) -> Result<String, AppError> {
    storage
        .signed_get_url(reference, SIGNED_URL_TTL)
        .await
        .map_err(AppError::from)
}

async fn resolve_opt(
    storage: &dyn Storage,
    reference: Option<StorageRef>,
) -> Result<Option<String>, AppError> {
    match reference {
        Some(r) => resolve(storage, &r).await.map(Some),
        None => Ok(None),
    }
}

/// Build the client view of a record, signing every stored reference.
///
/// The record itself keeps its references; signed URLs exist only in the
/// response. A reference that does not parse fails the whole call.
pub async fn sign_record(
    storage: &dyn Storage,
    record: VideoRecord,
) -> Result<VideoResponse, AppError> {
    let video_ref = record.video_ref().map_err(|e| {
        tracing::error!(video_id = %record.id, error = %e, "Stored video reference is malformed");
        e
    })?;
    let thumbnail_ref = record.thumbnail_ref().map_err(|e| {
        tracing::error!(video_id = %record.id, error = %e, "Stored thumbnail reference is malformed");
        e
    })?;

    let video_url = resolve_opt(storage, video_ref).await?;
    let thumbnail_url = resolve_opt(storage, thumbnail_ref).await?;

    Ok(VideoResponse::from_record(record, video_url, thumbnail_url))
}
