//! Test helpers: build AppState and router around a stub transcoder.
//!
//! Run from workspace root: `cargo test -p vidconv-api`.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use vidconv_api::setup::{create_state, routes};
use vidconv_api::state::AppState;
use vidconv_core::Config;
use vidconv_processing::Transcoder;

/// Stand-in for ffmpeg: writes fixed bytes or fails with a fixed reason.
pub struct StubTranscoder {
    outcome: Result<Vec<u8>, String>,
    pub calls: AtomicUsize,
}

impl StubTranscoder {
    pub fn succeeding(output: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(output.to_vec()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for StubTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(input.exists(), "input must be on disk before conversion");
        match &self.outcome {
            Ok(bytes) => {
                tokio::fs::write(output, bytes).await?;
                Ok(())
            }
            Err(reason) => Err(anyhow::anyhow!("{}", reason)),
        }
    }
}

/// Test application: server, shared state and the temp dir that backs storage.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.state.store.upload_dir().to_path_buf()
    }

    pub fn converted_dir(&self) -> PathBuf {
        self.state.store.converted_dir().to_path_buf()
    }
}

/// Setup test app with isolated storage directories.
pub async fn setup_test_app(transcoder: Arc<dyn Transcoder>) -> TestApp {
    setup_test_app_with(transcoder, |_| {}).await
}

pub async fn setup_test_app_with(
    transcoder: Arc<dyn Transcoder>,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    let (state, router, temp_dir) = build_test_router(transcoder, configure).await;
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Like [`setup_test_app`], but requests go over a real TCP connection, so response
/// bodies are consumed by hyper exactly as a client would see them.
pub async fn setup_http_test_app(transcoder: Arc<dyn Transcoder>) -> TestApp {
    let (state, router, temp_dir) = build_test_router(transcoder, |_| {}).await;
    let server = TestServer::builder()
        .http_transport()
        .build(router)
        .expect("Failed to start HTTP test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Router and state over fresh storage directories in a temp dir.
pub async fn build_test_router(
    transcoder: Arc<dyn Transcoder>,
    configure: impl FnOnce(&mut Config),
) -> (Arc<AppState>, Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::with_storage_root(temp_dir.path());
    configure(&mut config);

    let state = create_state(config, transcoder)
        .await
        .expect("Failed to build state");
    let router = routes::setup_routes(&state.config, state.clone()).expect("Failed to build routes");

    (state, router, temp_dir)
}

/// Sorted file names in `dir`
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Last path segment of a download link
pub fn download_id(link: &str) -> String {
    link.rsplit('/').next().unwrap_or_default().to_string()
}
