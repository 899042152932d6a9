//! Test fixtures: multipart forms, fake media bytes and directory listings.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use std::path::{Path, PathBuf};

/// Bytes that stand in for an MP4; the fake tools never parse them.
pub fn fake_mp4() -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.extend_from_slice(b"mdat-payload-then-moov");
    data
}

pub fn video_form(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name("boots.mp4")
        .mime_type(mime_type);
    MultipartForm::new().add_part("video", part)
}

pub fn thumbnail_form(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name("thumb")
        .mime_type(mime_type);
    MultipartForm::new().add_part("thumbnail", part)
}

/// Minimal 1x1 PNG.
pub fn minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.expect("Failed to read entry").path())
        .collect();
    entries.sort();
    entries
}

/// Split a signed local URL into its path and `(expires, signature)` query.
pub fn split_signed_url(url: &str, base_url: &str) -> (String, String, String) {
    let rest = url
        .strip_prefix(base_url)
        .unwrap_or_else(|| panic!("URL {} does not start with {}", url, base_url));
    let (path, query) = rest.split_once('?').expect("Signed URL has no query");
    let mut expires = None;
    let mut signature = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("expires", v)) => expires = Some(v.to_string()),
            Some(("signature", v)) => signature = Some(v.to_string()),
            _ => {}
        }
    }
    (
        format!("/media{}", path),
        expires.expect("missing expires"),
        signature.expect("missing signature"),
    )
}
