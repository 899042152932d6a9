#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::{S3Settings, S3Storage};
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::{Clock, Config};

/// Backend chosen from configuration.
///
/// `local` is set for the filesystem backend, whose signed URLs are served by
/// the application itself.
#[derive(Clone)]
pub struct ConfiguredStorage {
    pub storage: Arc<dyn Storage>,
    #[cfg(feature = "storage-local")]
    pub local: Option<Arc<LocalStorage>>,
}

/// Create a storage backend based on configuration
pub async fn create_storage(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> StorageResult<ConfiguredStorage> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let _ = clock;
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(S3Settings {
                bucket,
                region,
                endpoint_url: config.s3_endpoint().map(String::from),
                access_key_id: config.aws_access_key_id().map(String::from),
                secret_access_key: config.aws_secret_access_key().map(String::from),
            })?;
            Ok(ConfiguredStorage {
                storage: Arc::new(storage),
                #[cfg(feature = "storage-local")]
                local: None,
            })
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let local = Arc::new(
                LocalStorage::new(
                    base_path,
                    base_url,
                    config.local_storage_bucket().to_string(),
                    config.jwt_secret().as_bytes().to_vec(),
                    clock,
                )
                .await?,
            );
            Ok(ConfiguredStorage {
                storage: local.clone(),
                local: Some(local),
            })
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
