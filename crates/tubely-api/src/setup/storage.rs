//! Storage backend setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::{Clock, Config};
use tubely_storage::{create_storage, ConfiguredStorage};

pub async fn setup_storage(config: &Config, clock: Arc<dyn Clock>) -> Result<ConfiguredStorage> {
    let storage = create_storage(config, clock)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.storage.backend_type(),
        bucket = %storage.storage.bucket(),
        "Storage backend initialized"
    );

    Ok(storage)
}
