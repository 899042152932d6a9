//! Video introspection - stream geometry via ffprobe

use super::validate_tool_path;
use crate::ProcessingError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tubely_core::Orientation;

/// Geometry of the first video stream in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
}

impl StreamInfo {
    pub fn orientation(&self) -> Orientation {
        Orientation::classify(self.width, self.height)
    }
}

/// Reads stream geometry from a local media file.
#[async_trait]
pub trait MediaIntrospector: Send + Sync {
    async fn introspect(&self, path: &Path) -> Result<StreamInfo, ProcessingError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Pick the first video-typed stream out of ffprobe's JSON.
fn select_video_stream(stdout: &[u8]) -> Result<StreamInfo, ProcessingError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout).map_err(|e| {
        ProcessingError::IntrospectionFailed(format!("Failed to parse ffprobe output: {}", e))
    })?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or(ProcessingError::NoVideoStream)?;

    let width = stream.width.unwrap_or(0);
    let height = stream.height.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidDimensions { width, height });
    }

    Ok(StreamInfo { width, height })
}

pub struct FfprobeIntrospector {
    ffprobe_path: String,
}

impl FfprobeIntrospector {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self, ProcessingError> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl MediaIntrospector for FfprobeIntrospector {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn introspect(&self, path: &Path) -> Result<StreamInfo, ProcessingError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ProcessingError::IntrospectionFailed(format!("Failed to execute ffprobe: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(status = %output.status, stderr = %stderr.trim(), "ffprobe failed");
            return Err(ProcessingError::IntrospectionFailed(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let info = select_video_stream(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = info.width,
            height = info.height,
            orientation = %info.orientation(),
            "Video probe completed"
        );

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_first_video_stream() {
        let json = br#"{"streams":[
            {"index":0,"codec_type":"audio","codec_name":"aac"},
            {"index":1,"codec_type":"video","width":1080,"height":1920},
            {"index":2,"codec_type":"video","width":640,"height":360}
        ]}"#;
        let info = select_video_stream(json).unwrap();
        assert_eq!(info, StreamInfo { width: 1080, height: 1920 });
        assert_eq!(info.orientation(), Orientation::Portrait);
    }

    #[test]
    fn test_audio_only_has_no_video_stream() {
        let json = br#"{"streams":[{"codec_type":"audio"}]}"#;
        assert!(matches!(
            select_video_stream(json),
            Err(ProcessingError::NoVideoStream)
        ));
        assert!(matches!(
            select_video_stream(b"{}"),
            Err(ProcessingError::NoVideoStream)
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let json = br#"{"streams":[{"codec_type":"video","width":0,"height":720}]}"#;
        assert!(matches!(
            select_video_stream(json),
            Err(ProcessingError::InvalidDimensions { width: 0, height: 720 })
        ));

        let json = br#"{"streams":[{"codec_type":"video"}]}"#;
        assert!(matches!(
            select_video_stream(json),
            Err(ProcessingError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_garbage_output_is_introspection_failure() {
        assert!(matches!(
            select_video_stream(b"not json"),
            Err(ProcessingError::IntrospectionFailed(_))
        ));
    }

    #[test]
    fn test_rejects_dangerous_tool_path() {
        assert!(FfprobeIntrospector::new("ffprobe; rm -rf /").is_err());
        assert!(FfprobeIntrospector::new("/usr/bin/ffprobe").is_ok());
    }

    #[tokio::test]
    async fn test_missing_binary_is_introspection_failure() {
        let probe = FfprobeIntrospector::new("/nonexistent/tubely-ffprobe").unwrap();
        let result = probe.introspect(Path::new("/tmp/whatever.mp4")).await;
        assert!(matches!(
            result,
            Err(ProcessingError::IntrospectionFailed(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_tool_and_parses_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-ffprobe");
        std::fs::write(
            &script,
            "#!/bin/sh\necho '{\"streams\":[{\"codec_type\":\"video\",\"width\":1920,\"height\":1080}]}'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = FfprobeIntrospector::new(script.to_string_lossy()).unwrap();
        let info = probe.introspect(Path::new("input.mp4")).await.unwrap();
        assert_eq!(info.orientation(), Orientation::Landscape);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_introspection_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("failing-ffprobe");
        std::fs::write(&script, "#!/bin/sh\necho 'moov atom not found' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = FfprobeIntrospector::new(script.to_string_lossy()).unwrap();
        match probe.introspect(Path::new("input.mp4")).await {
            Err(ProcessingError::IntrospectionFailed(msg)) => {
                assert!(msg.contains("moov atom not found"))
            }
            other => panic!("expected IntrospectionFailed, got {:?}", other),
        }
    }
}
