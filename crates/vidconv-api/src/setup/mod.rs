//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::services::cleanup::CleanupService;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidconv_core::Config;
use vidconv_processing::{FFmpegTranscoder, TranscodeWorker, Transcoder, WorkerOptions};
use vidconv_storage::ArtifactStore;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(environment = %config.environment, "Configuration loaded and validated successfully");

    let transcoder = FFmpegTranscoder::new(config.ffmpeg_path.clone())
        .context("Invalid FFMPEG_PATH")?;
    match transcoder.version().await {
        Ok(version) => tracing::info!(ffmpeg = %version, "Transcoder available"),
        Err(e) => tracing::warn!(
            error = %e,
            ffmpeg_path = %transcoder.ffmpeg_path(),
            "Transcoder not available, conversions will fail until it is installed"
        ),
    }

    let state = create_state(config, Arc::new(transcoder)).await?;

    if let Some(ttl) = state.config.artifact_ttl() {
        let interval = std::time::Duration::from_secs(state.config.artifact_sweep_interval_secs);
        Arc::new(CleanupService::new(state.store.clone(), ttl, interval)).start();
    }

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Build the shared state around a given transcoder.
pub async fn create_state(
    config: Config,
    transcoder: Arc<dyn Transcoder>,
) -> Result<Arc<AppState>> {
    let store = ArtifactStore::from_config(&config)
        .await
        .context("Failed to prepare storage directories")?;
    let worker = TranscodeWorker::new(transcoder, store.clone(), WorkerOptions::from_config(&config));

    Ok(Arc::new(AppState {
        config,
        store,
        worker,
    }))
}
