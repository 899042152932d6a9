//! Fast-start remux - moves the MP4 index ahead of the media data

use super::validate_tool_path;
use crate::ProcessingError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempPath;
use tokio::process::Command;

/// Remuxed copy of an input file. The file is removed when this is dropped.
#[derive(Debug)]
pub struct TransformedMedia {
    path: TempPath,
}

impl TransformedMedia {
    pub fn new(path: TempPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Produces a progressive-playback copy of a video. The input is never modified.
#[async_trait]
pub trait FastStartTransformer: Send + Sync {
    async fn remux(&self, input: &Path) -> Result<TransformedMedia, ProcessingError>;
}

pub struct FfmpegFastStart {
    ffmpeg_path: String,
    temp_dir: PathBuf,
}

impl FfmpegFastStart {
    pub fn new(
        ffmpeg_path: impl Into<String>,
        temp_dir: impl Into<PathBuf>,
    ) -> Result<Self, ProcessingError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            temp_dir: temp_dir.into(),
        })
    }

    fn output_file(&self) -> Result<TempPath, ProcessingError> {
        tempfile::Builder::new()
            .prefix("tubely-faststart-")
            .suffix(".mp4")
            .tempfile_in(&self.temp_dir)
            .map(|f| f.into_temp_path())
            .map_err(|e| {
                ProcessingError::TransformFailed(format!("Failed to create output file: {}", e))
            })
    }
}

#[async_trait]
impl FastStartTransformer for FfmpegFastStart {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> Result<TransformedMedia, ProcessingError> {
        let start = std::time::Instant::now();

        // Registered for removal before ffmpeg runs, so failures clean up too.
        let output_path = self.output_file()?;

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4", "-y"])
            .arg(&*output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ProcessingError::TransformFailed(format!("Failed to execute ffmpeg: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(status = %output.status, stderr = %stderr.trim(), "ffmpeg remux failed");
            return Err(ProcessingError::TransformFailed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_path.display(),
            "Fast-start remux completed"
        );

        Ok(TransformedMedia::new(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_rejects_dangerous_tool_path() {
        assert!(FfmpegFastStart::new("ffmpeg && curl evil", "/tmp").is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let remuxer = FfmpegFastStart::new("/nonexistent/tubely-ffmpeg", dir.path()).unwrap();
        let result = remuxer.remux(Path::new("in.mp4")).await;
        assert!(matches!(result, Err(ProcessingError::TransformFailed(_))));
        assert!(entries(dir.path()).is_empty());
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_is_distinct_and_removed_on_drop() {
        let tools = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        // Copies input ($2) to the last argument, like a stream-copy remux.
        let script = write_script(
            tools.path(),
            "fake-ffmpeg",
            "#!/bin/sh\nfor last; do :; done\ncp \"$2\" \"$last\"\n",
        );

        let input = work.path().join("staged.mp4");
        std::fs::write(&input, b"mdat-then-moov").unwrap();

        let remuxer = FfmpegFastStart::new(script.to_string_lossy(), work.path()).unwrap();
        let media = remuxer.remux(&input).await.unwrap();

        assert_ne!(media.path(), input.as_path());
        assert_eq!(std::fs::read(media.path()).unwrap(), b"mdat-then-moov");
        assert_eq!(std::fs::read(&input).unwrap(), b"mdat-then-moov");

        drop(media);
        assert_eq!(entries(work.path()), vec!["staged.mp4".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_remux_removes_output() {
        let tools = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let script = write_script(
            tools.path(),
            "failing-ffmpeg",
            "#!/bin/sh\necho 'Invalid data found' >&2\nexit 1\n",
        );

        let remuxer = FfmpegFastStart::new(script.to_string_lossy(), work.path()).unwrap();
        match remuxer.remux(Path::new("in.mp4")).await {
            Err(ProcessingError::TransformFailed(msg)) => assert!(msg.contains("Invalid data")),
            other => panic!("expected TransformFailed, got {:?}", other),
        }
        assert!(entries(work.path()).is_empty());
    }
}
