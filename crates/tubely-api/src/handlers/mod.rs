pub mod health;
pub mod media_file;
pub mod thumbnail_upload;
pub mod video_get;
pub mod video_upload;

use tubely_core::AppError;
use uuid::Uuid;

/// Path ids are taken as strings so a malformed one is a 400 with our error body.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid video ID: {}", raw)))
}
