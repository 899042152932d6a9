use crate::error::multipart_error;
use axum::extract::multipart::Field;
use std::path::Path;
use tempfile::TempPath;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tubely_core::AppError;

/// Upload body copied to local disk. The file is removed when this is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    path: TempPath,
    size: u64,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Stream a multipart field into a fresh temp file under `temp_dir`.
///
/// The removal guard exists before the first byte is written, so a failed or
/// oversized read leaves nothing behind.
pub async fn stage_field(
    field: &mut Field<'_>,
    temp_dir: &Path,
    max_bytes: usize,
) -> Result<StagedUpload, AppError> {
    let named = tempfile::Builder::new()
        .prefix("tubely-upload-")
        .suffix(".mp4")
        .tempfile_in(temp_dir)
        .map_err(|e| AppError::Internal(format!("Failed to create staging file: {}", e)))?;
    let (std_file, path) = named.into_parts();
    let mut file = tokio::fs::File::from_std(std_file);

    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len() as u64;
        if size > max_bytes as u64 {
            return Err(AppError::PayloadTooLarge(format!(
                "Upload exceeds maximum size of {} MB",
                max_bytes / 1024 / 1024
            )));
        }
        file.write_all(&chunk).await?;
    }

    if size == 0 {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    file.flush().await?;
    file.rewind().await?;

    tracing::debug!(path = %path.display(), size_bytes = size, "Upload staged");

    Ok(StagedUpload { path, size })
}
