//! Periodic removal of converted artifacts that were never downloaded

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use vidconv_storage::{ArtifactStore, StorageResult};

pub struct CleanupService {
    store: ArtifactStore,
    ttl: Duration,
    interval: Duration,
}

impl CleanupService {
    pub fn new(store: ArtifactStore, ttl: Duration, interval: Duration) -> Self {
        Self {
            store,
            ttl,
            interval,
        }
    }

    /// Start the sweep loop on a background task.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tracing::info!(
            ttl_secs = self.ttl.as_secs(),
            interval_secs = self.interval.as_secs(),
            "Artifact cleanup started"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_once().await {
                    tracing::error!(error = %e, "Artifact sweep failed");
                }
            }
        })
    }

    pub async fn run_once(&self) -> StorageResult<usize> {
        let removed = self.store.sweep_expired(self.ttl).await?;
        if removed > 0 {
            tracing::info!(removed, "Expired artifacts removed");
        } else {
            tracing::debug!("No expired artifacts");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_run_once_respects_ttl() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("uploads"), dir.path().join("converted"))
            .await
            .unwrap();
        let upload = store.generate_upload_path("mov");
        tokio::fs::write(&upload, b"in").await.unwrap();
        let artifact = store.generate_output_path("mp4");
        tokio::fs::write(&artifact, b"out").await.unwrap();

        let fresh = CleanupService::new(store.clone(), Duration::from_secs(3600), Duration::from_secs(60));
        assert_eq!(fresh.run_once().await.unwrap(), 0);

        let expired = CleanupService::new(store.clone(), Duration::ZERO, Duration::from_secs(60));
        assert_eq!(expired.run_once().await.unwrap(), 1);
        assert!(!store.exists(&artifact).await);
        // uploads are never swept
        assert!(store.exists(&upload).await);
    }
}
