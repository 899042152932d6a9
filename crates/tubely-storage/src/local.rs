use crate::traits::{Storage, StorageError, StorageResult};
use crate::{StorageBackend, StorageRef};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bytes::Bytes;
use chrono::Duration as ChronoDuration;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tubely_core::Clock;

type HmacSha256 = Hmac<Sha256>;

/// Object opened through a verified signed URL.
#[derive(Debug)]
pub struct LocalObject {
    pub file: fs::File,
    pub size: u64,
    pub content_type: &'static str,
}

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}`. Signed URLs point at
/// `{base_url}/{bucket}/{key}` with an `expires` unix timestamp and an
/// HMAC-SHA256 `signature` over bucket, key and expiry.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
    signing_key: Vec<u8>,
    clock: Arc<dyn Clock>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tubely/media")
    /// * `base_url` - Base URL the media route is mounted at (e.g., "http://localhost:8091/media")
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        bucket: String,
        signing_key: impl Into<Vec<u8>>,
        clock: Arc<dyn Clock>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(base_path.join(&bucket))
            .await
            .map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    base_path.display(),
                    e
                ))
            })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            bucket,
            signing_key: signing_key.into(),
            clock,
        })
    }

    /// Resolve bucket and key to a path under the base directory.
    ///
    /// Only plain path components are accepted, so nothing can resolve outside
    /// the storage root.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        let is_plain = |s: &str| {
            !s.is_empty()
                && Path::new(s)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
        };
        if !is_plain(bucket) || bucket.contains('/') {
            return Err(StorageError::InvalidKey(format!("Invalid bucket: {}", bucket)));
        }
        if !is_plain(key) || key.contains('\\') {
            return Err(StorageError::InvalidKey(format!("Invalid key: {}", key)));
        }
        Ok(self.base_path.join(bucket).join(key))
    }

    fn mac(&self, bucket: &str, key: &str, expires: i64) -> StorageResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .map_err(|e| StorageError::ConfigError(format!("Invalid signing key: {}", e)))?;
        mac.update(bucket.as_bytes());
        mac.update(b"\n");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    fn sign(&self, bucket: &str, key: &str, expires: i64) -> StorageResult<String> {
        let tag = self.mac(bucket, key, expires)?.finalize().into_bytes();
        Ok(URL_SAFE_NO_PAD.encode(tag))
    }

    /// Check a signature produced by [`Storage::signed_get_url`] and open the object.
    pub async fn open_signed(
        &self,
        bucket: &str,
        key: &str,
        expires: i64,
        signature: &str,
    ) -> StorageResult<LocalObject> {
        let tag = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| StorageError::AccessDenied("Malformed signature".to_string()))?;
        self.mac(bucket, key, expires)?
            .verify_slice(&tag)
            .map_err(|_| StorageError::AccessDenied("Invalid signature".to_string()))?;

        if self.clock.now().timestamp() > expires {
            return Err(StorageError::AccessDenied(
                "Signed URL has expired".to_string(),
            ));
        }

        let path = self.object_path(bucket, key)?;
        let file = fs::File::open(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(format!("{},{}", bucket, key)),
            _ => StorageError::IoError(e),
        })?;
        let size = file.metadata().await?.len();

        Ok(LocalObject {
            file,
            size,
            content_type: content_type_for(key),
        })
    }

    async fn write_atomically<F, Fut>(&self, key: &str, write: F) -> StorageResult<StorageRef>
    where
        F: FnOnce(fs::File) -> Fut,
        Fut: std::future::Future<Output = std::io::Result<u64>>,
    {
        let path = self.object_path(&self.bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut partial = path.clone().into_os_string();
        partial.push(".partial");
        let partial = PathBuf::from(partial);

        let start = std::time::Instant::now();

        let file = fs::File::create(&partial).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create file {}: {}",
                partial.display(),
                e
            ))
        })?;

        let size = match write(file).await {
            Ok(size) => size,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Local storage write failed"
                );
                return Err(StorageError::UploadFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        if let Err(e) = fs::rename(&partial, &path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to move file into place {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        StorageRef::new(self.bucket.clone(), key).map_err(|e| StorageError::InvalidKey(e.to_string()))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_file(
        &self,
        key: &str,
        _content_type: &str,
        mut file: fs::File,
    ) -> StorageResult<StorageRef> {
        self.write_atomically(key, |mut dest| async move {
            let size = tokio::io::copy(&mut file, &mut dest).await?;
            dest.sync_all().await?;
            Ok(size)
        })
        .await
    }

    async fn put_bytes(
        &self,
        key: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<StorageRef> {
        self.write_atomically(key, |mut dest| async move {
            dest.write_all(&data).await?;
            dest.sync_all().await?;
            Ok(data.len() as u64)
        })
        .await
    }

    async fn signed_get_url(
        &self,
        reference: &StorageRef,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.object_path(reference.bucket(), reference.key())?;

        let ttl = ChronoDuration::from_std(expires_in)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        let expires = (self.clock.now() + ttl).timestamp();
        let signature = self.sign(reference.bucket(), reference.key(), expires)?;

        Ok(format!(
            "{}/{}/{}?expires={}&signature={}",
            self.base_url.trim_end_matches('/'),
            reference.bucket(),
            reference.key(),
            expires,
            signature
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

fn content_type_for(key: &str) -> &'static str {
    match Path::new(key).extension().and_then(|e| e.to_str()) {
        Some("mp4") => "video/mp4",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
