//! Fixed pipeline constants.

use std::time::Duration;

/// Validity window of every signed access URL. Not configurable per call.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// Hard ceiling on an upload request body.
pub const MAX_UPLOAD_BYTES: usize = 1 << 30;

/// Multipart field carrying the video payload.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Multipart field carrying a thumbnail image.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

/// Content types admitted for video uploads.
pub const ALLOWED_VIDEO_TYPES: &[&str] = &["video/mp4"];

/// Content types admitted for thumbnails, with the extension used in keys.
pub const ALLOWED_THUMBNAIL_TYPES: &[(&str, &str)] = &[("image/png", "png"), ("image/jpeg", "jpg")];
