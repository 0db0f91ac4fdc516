//! Shared application state

use vidconv_core::Config;
use vidconv_processing::TranscodeWorker;
use vidconv_storage::ArtifactStore;

/// Everything a request handler needs, built once at startup and shared via `Arc`.
pub struct AppState {
    pub config: Config,
    pub store: ArtifactStore,
    pub worker: TranscodeWorker,
}
