use crate::error::{StorageError, StorageResult};
use crate::keys::NameGenerator;
use bytes::Bytes;
use futures::Stream;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::fs;
use vidconv_core::Config;

/// Chunked file contents, as produced by [`ArtifactStore::open_stream`].
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Local filesystem store for uploads and converted artifacts
#[derive(Clone)]
pub struct ArtifactStore {
    upload_dir: PathBuf,
    converted_dir: PathBuf,
    names: Arc<NameGenerator>,
}

impl ArtifactStore {
    /// Create both directories if needed.
    pub async fn new(
        upload_dir: impl Into<PathBuf>,
        converted_dir: impl Into<PathBuf>,
    ) -> StorageResult<Self> {
        let upload_dir = upload_dir.into();
        let converted_dir = converted_dir.into();

        for dir in [&upload_dir, &converted_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        tracing::info!(
            upload_dir = %upload_dir.display(),
            converted_dir = %converted_dir.display(),
            "Artifact store ready"
        );

        Ok(ArtifactStore {
            upload_dir,
            converted_dir,
            names: Arc::new(NameGenerator::new()),
        })
    }

    pub async fn from_config(config: &Config) -> StorageResult<Self> {
        Self::new(config.upload_dir.clone(), config.converted_dir.clone()).await
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn converted_dir(&self) -> &Path {
        &self.converted_dir
    }

    /// Fresh path in the uploads directory
    pub fn generate_upload_path(&self, original_extension: &str) -> PathBuf {
        self.upload_dir
            .join(self.names.next_file_name(original_extension))
    }

    /// Fresh path in the converted-output directory
    pub fn generate_output_path(&self, target_extension: &str) -> PathBuf {
        self.converted_dir
            .join(self.names.next_file_name(target_extension))
    }

    /// Create a new, empty upload file. Fails rather than truncating if the path exists.
    pub async fn create_upload_file(
        &self,
        original_extension: &str,
    ) -> StorageResult<(PathBuf, fs::File)> {
        let path = self.generate_upload_path(original_extension);
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok((path, file))
    }

    /// Delete a file. A file that is already gone is logged and treated as success.
    pub async fn delete(&self, path: &Path) -> StorageResult<()> {
        let start = std::time::Instant::now();

        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "File deleted"
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "File already absent, nothing to delete");
                Ok(())
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Delete and log the outcome; never fails.
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = self.delete(path).await {
            tracing::error!(error = %e, path = %path.display(), "Best-effort delete failed");
        }
    }

    /// True only for regular files
    pub async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    /// Map a public download identifier to its path in the converted directory.
    ///
    /// The identifier must be a bare file name: no separators, no `..`, not hidden.
    pub fn resolve_artifact(&self, download_id: &str) -> StorageResult<PathBuf> {
        let is_bare_name = !download_id.is_empty()
            && !download_id.starts_with('.')
            && !download_id.contains(['/', '\\', '\0'])
            && Path::new(download_id).file_name().and_then(|n| n.to_str()) == Some(download_id);

        if !is_bare_name {
            return Err(StorageError::InvalidKey(download_id.to_string()));
        }

        Ok(self.converted_dir.join(download_id))
    }

    pub async fn content_length(&self, path: &Path) -> StorageResult<u64> {
        let meta = fs::metadata(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::ReadFailed(e.to_string()),
        })?;
        Ok(meta.len())
    }

    /// Open a file as a stream of chunks.
    pub async fn open_stream(&self, path: &Path) -> StorageResult<ByteStream> {
        let file = fs::File::open(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::ReadFailed(format!(
                "Failed to open file {}: {}",
                path.display(),
                e
            )),
        })?;

        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(path = %path_display, error = %e, "Stream read error");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    /// Delete converted artifacts whose modification time is at least `ttl` old.
    /// Returns the number of files removed.
    #[tracing::instrument(skip(self), fields(converted_dir = %self.converted_dir.display()))]
    pub async fn sweep_expired(&self, ttl: Duration) -> StorageResult<usize> {
        let now = SystemTime::now();
        let mut entries = fs::read_dir(&self.converted_dir).await?;
        let mut removed = 0usize;

        while let Some(entry) = entries.next_entry().await? {
            let meta = match entry.metadata().await {
                Ok(meta) if meta.is_file() => meta,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let age = meta
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age < ttl {
                continue;
            }

            let path = entry.path();
            match self.delete(&path).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::error!(error = %e, "Failed to sweep expired artifact"),
            }
        }

        Ok(removed)
    }
}
