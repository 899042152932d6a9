use crate::auth::CredentialValidator;
use crate::services::upload::VideoUploadService;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_storage::{LocalStorage, Storage};

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub storage: Arc<dyn Storage>,
    /// Set when the local backend is active; its signed URLs are served by `/media`.
    pub local_media: Option<Arc<LocalStorage>>,
    pub uploads: VideoUploadService,
    pub credentials: Arc<dyn CredentialValidator>,
}
