//! Shared key generation for storage backends.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use tubely_core::Orientation;

const TOKEN_BYTES: usize = 32;
const THUMBNAIL_PREFIX: &str = "thumbnails";

/// 32 bytes from the thread-local CSPRNG, unpadded URL-safe base64 (43 chars).
pub fn random_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// `{orientation}/{token}.{ext}`
pub fn video_key(orientation: Orientation, ext: &str) -> String {
    format!("{}/{}.{}", orientation.as_str(), random_token(), ext)
}

/// `thumbnails/{token}.{ext}`
pub fn thumbnail_key(ext: &str) -> String {
    format!("{}/{}.{}", THUMBNAIL_PREFIX, random_token(), ext)
}
