//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::JwtValidator;
use crate::services::upload::{UploadLimits, VideoUploadService};
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::{Clock, Config, SystemClock};
use tubely_processing::{FfmpegFastStart, FfprobeIntrospector};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let videos = database::setup_database(&config).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let storage = storage::setup_storage(&config, clock).await?;

    let introspector = FfprobeIntrospector::new(config.ffprobe_path())
        .context("Invalid FFPROBE_PATH")?;
    let transformer = FfmpegFastStart::new(config.ffmpeg_path(), config.upload_temp_dir().clone())
        .context("Invalid FFMPEG_PATH")?;

    tokio::fs::create_dir_all(config.upload_temp_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                config.upload_temp_dir().display()
            )
        })?;

    let uploads = VideoUploadService::new(
        videos.clone(),
        storage.storage.clone(),
        Arc::new(introspector),
        Arc::new(transformer),
        UploadLimits {
            temp_dir: config.upload_temp_dir().clone(),
            max_video_bytes: config.max_video_size_bytes(),
            max_thumbnail_bytes: config.max_thumbnail_size_bytes(),
        },
    );

    let state = Arc::new(AppState {
        credentials: Arc::new(JwtValidator::new(config.jwt_secret())),
        videos,
        storage: storage.storage,
        local_media: storage.local,
        uploads,
        config,
    });

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
