//! Video conversion module

pub mod service;
pub mod worker;

pub use service::FFmpegTranscoder;
pub use worker::{TranscodeWorker, WorkerOptions};
