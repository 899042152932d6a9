//! Deterministic stand-ins for the media tools, the object store and the metadata store.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tubely_core::{AppError, VideoRecord};
use tubely_db::VideoStore;
use tubely_processing::{
    FastStartTransformer, MediaIntrospector, ProcessingError, StreamInfo, TransformedMedia,
};
use tubely_storage::{Storage, StorageBackend, StorageError, StorageRef, StorageResult};
use uuid::Uuid;

/// Reports a fixed geometry (or fails when `fail` is set) and counts invocations.
pub struct CountingIntrospector {
    stream: StreamInfo,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingIntrospector {
    pub fn new(stream: StreamInfo, fail: bool) -> Self {
        Self {
            stream,
            fail,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaIntrospector for CountingIntrospector {
    async fn introspect(&self, path: &Path) -> Result<StreamInfo, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !path.exists() {
            return Err(ProcessingError::IntrospectionFailed(format!(
                "staged file missing: {}",
                path.display()
            )));
        }
        if self.fail {
            return Err(ProcessingError::IntrospectionFailed(
                "Invalid data found when processing input".to_string(),
            ));
        }
        Ok(self.stream)
    }
}

/// Copies the input to a new temp file, prefixed with a marker so tests can
/// tell the remuxed bytes from the original.
pub struct CountingRemuxer {
    temp_dir: PathBuf,
    fail: bool,
    calls: AtomicUsize,
}

pub const REMUX_MARKER: &[u8] = b"faststart:";

impl CountingRemuxer {
    pub fn new(temp_dir: PathBuf, fail: bool) -> Self {
        Self {
            temp_dir,
            fail,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FastStartTransformer for CountingRemuxer {
    async fn remux(&self, input: &Path) -> Result<TransformedMedia, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let output = tempfile::Builder::new()
            .prefix("fake-faststart-")
            .suffix(".mp4")
            .tempfile_in(&self.temp_dir)
            .map_err(|e| ProcessingError::TransformFailed(e.to_string()))?
            .into_temp_path();

        if self.fail {
            return Err(ProcessingError::TransformFailed(
                "moov atom not found".to_string(),
            ));
        }

        let mut bytes = REMUX_MARKER.to_vec();
        bytes.extend(
            std::fs::read(input).map_err(|e| ProcessingError::TransformFailed(e.to_string()))?,
        );
        std::fs::write(&output, bytes)
            .map_err(|e| ProcessingError::TransformFailed(e.to_string()))?;

        Ok(TransformedMedia::new(output))
    }
}

/// Store whose writes always fail; reads go to the wrapped store.
pub struct RejectingStore<S> {
    pub inner: S,
}

#[async_trait]
impl<S: VideoStore> VideoStore for RejectingStore<S> {
    async fn create_video(&self, record: &VideoRecord) -> Result<(), AppError> {
        self.inner.create_video(record).await
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        self.inner.get_video(id).await
    }

    async fn update_video(&self, _record: &VideoRecord) -> Result<VideoRecord, AppError> {
        Err(AppError::Internal("connection reset by peer".to_string()))
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        self.inner.list_videos_for_user(user_id).await
    }
}

/// Object store whose writes always fail; signing goes to the wrapped store.
pub struct RejectingStorage {
    pub inner: Arc<dyn Storage>,
}

#[async_trait]
impl Storage for RejectingStorage {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    async fn put_file(
        &self,
        key: &str,
        _content_type: &str,
        _file: tokio::fs::File,
    ) -> StorageResult<StorageRef> {
        Err(StorageError::UploadFailed(format!(
            "503 SlowDown while writing {}",
            key
        )))
    }

    async fn put_bytes(
        &self,
        key: &str,
        _content_type: &str,
        _data: Bytes,
    ) -> StorageResult<StorageRef> {
        Err(StorageError::UploadFailed(format!(
            "503 SlowDown while writing {}",
            key
        )))
    }

    async fn signed_get_url(
        &self,
        reference: &StorageRef,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.inner.signed_get_url(reference, expires_in).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
