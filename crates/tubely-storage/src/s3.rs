use crate::traits::{Storage, StorageError, StorageResult};
use crate::{StorageBackend, StorageRef};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Connection settings for [`S3Storage`].
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    // Kept to build signers for references that name another bucket.
    builder: AmazonS3Builder,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Credentials not given explicitly are picked up from the environment
    /// (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, instance metadata, ...).
    pub fn new(settings: S3Settings) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(settings.region.clone())
            .with_bucket_name(settings.bucket.clone());

        if let Some(ref endpoint) = settings.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }
        if let Some(key_id) = settings.access_key_id {
            builder = builder.with_access_key_id(key_id);
        }
        if let Some(secret) = settings.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }

        let store = builder
            .clone()
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            builder,
            bucket: settings.bucket,
        })
    }

    fn reference(&self, key: &str) -> StorageResult<StorageRef> {
        StorageRef::new(self.bucket.clone(), key).map_err(|e| StorageError::InvalidKey(e.to_string()))
    }

    async fn put_payload(
        &self,
        key: &str,
        content_type: &str,
        payload: PutPayload,
    ) -> StorageResult<StorageRef> {
        let size = payload.content_length();
        let location = Path::from(key.to_string());
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        self.store
            .put_opts(&location, payload, opts)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        self.reference(key)
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        mut file: tokio::fs::File,
    ) -> StorageResult<StorageRef> {
        // Single put: the file is read fully into memory before the request.
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read local file: {}", e))
        })?;

        self.put_payload(key, content_type, PutPayload::from(buffer))
            .await
    }

    async fn put_bytes(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StorageRef> {
        self.put_payload(key, content_type, PutPayload::from(data))
            .await
    }

    async fn signed_get_url(
        &self,
        reference: &StorageRef,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(reference.key().to_string());

        let url = if reference.bucket() == self.bucket {
            self.store
                .signed_url(Method::GET, &location, expires_in)
                .await
        } else {
            let store = self
                .builder
                .clone()
                .with_bucket_name(reference.bucket())
                .build()
                .map_err(|e| StorageError::ConfigError(e.to_string()))?;
            store.signed_url(Method::GET, &location, expires_in).await
        };

        let url = url.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %reference.bucket(),
                key = %reference.key(),
                "S3 URL signing failed"
            );
            StorageError::SigningFailed(e.to_string())
        })?;

        Ok(url.to_string())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
