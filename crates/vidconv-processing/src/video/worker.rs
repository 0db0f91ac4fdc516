//! Transcode worker: one conversion per call, run on its own task.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use vidconv_core::{Config, ConversionJob, ConvertedArtifact};
use vidconv_storage::ArtifactStore;

use crate::error::TranscodeError;
use crate::traits::Transcoder;

#[derive(Clone, Debug)]
pub struct WorkerOptions {
    /// Extension of produced artifacts, without the leading dot
    pub target_extension: String,
    /// Upper bound on simultaneous conversions. `None` = unbounded.
    pub max_concurrent: Option<usize>,
    /// Per-conversion deadline. `None` = wait for the engine indefinitely.
    pub timeout: Option<Duration>,
}

impl WorkerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_extension: config.target_extension.clone(),
            max_concurrent: (config.max_concurrent_conversions > 0)
                .then_some(config.max_concurrent_conversions),
            timeout: config.conversion_timeout(),
        }
    }
}

#[derive(Clone)]
pub struct TranscodeWorker {
    transcoder: Arc<dyn Transcoder>,
    store: ArtifactStore,
    target_extension: String,
    permits: Option<Arc<Semaphore>>,
    timeout: Option<Duration>,
}

impl TranscodeWorker {
    pub fn new(transcoder: Arc<dyn Transcoder>, store: ArtifactStore, options: WorkerOptions) -> Self {
        tracing::info!(
            target_extension = %options.target_extension,
            max_concurrent = ?options.max_concurrent,
            timeout_secs = ?options.timeout.map(|t| t.as_secs()),
            "Transcode worker initialized"
        );

        Self {
            transcoder,
            store,
            target_extension: options.target_extension,
            permits: options.max_concurrent.map(|n| Arc::new(Semaphore::new(n.max(1)))),
            timeout: options.timeout,
        }
    }

    /// Convert `input` into a new artifact in the converted directory.
    ///
    /// The conversion runs on a spawned task: dropping the returned future (for example
    /// when the client disconnects) does not cancel it. On success the input file is
    /// deleted best-effort; on failure it is left where it is.
    pub async fn convert(&self, input: &Path) -> Result<ConvertedArtifact, TranscodeError> {
        let worker = self.clone();
        let input = input.to_path_buf();

        tokio::spawn(async move { worker.run(input).await })
            .await
            .map_err(|e| TranscodeError::Aborted(e.to_string()))?
    }

    #[tracing::instrument(skip(self, input), fields(input = %input.display()))]
    async fn run(&self, input: PathBuf) -> Result<ConvertedArtifact, TranscodeError> {
        let _permit = match &self.permits {
            Some(permits) => Some(
                permits
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| TranscodeError::Aborted(e.to_string()))?,
            ),
            None => None,
        };

        let output = self.store.generate_output_path(&self.target_extension);
        let mut job = ConversionJob::new(input, output);

        tracing::info!(
            output = %job.output_path.display(),
            status = %job.status,
            "Conversion started"
        );

        let engine = self.transcoder.transcode(&job.input_path, &job.output_path);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, engine).await {
                Ok(r) => r.map_err(|e| TranscodeError::Engine(format!("{:#}", e))),
                Err(_) => Err(TranscodeError::TimedOut(limit)),
            },
            None => engine
                .await
                .map_err(|e| TranscodeError::Engine(format!("{:#}", e))),
        };

        if let Err(e) = result {
            job.fail(e.to_string());
            tracing::error!(
                output = %job.output_path.display(),
                status = %job.status,
                error = %e,
                elapsed_ms = job.elapsed_ms(),
                "Conversion failed, input kept"
            );
            return Err(e);
        }

        job.succeed();
        tracing::info!(
            output = %job.output_path.display(),
            status = %job.status,
            elapsed_ms = job.elapsed_ms(),
            "Conversion finished"
        );

        if let Err(e) = self.store.delete(&job.input_path).await {
            tracing::warn!(
                error = %e,
                input = %job.input_path.display(),
                "Failed to delete input after conversion, file left behind"
            );
        }

        let output = job.output_path.display().to_string();
        ConvertedArtifact::from_path(job.output_path).ok_or(TranscodeError::InvalidOutput(output))
    }
}
