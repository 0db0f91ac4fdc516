//! Transcoding capability trait

use async_trait::async_trait;
use std::path::Path;

/// External conversion engine.
///
/// One call converts `input` into `output`; the output format follows from the output
/// path's extension. Implementations report engine failures as opaque errors and must
/// not retry.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, input: &Path, output: &Path) -> anyhow::Result<()>;
}
