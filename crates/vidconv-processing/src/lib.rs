//! vidconv Processing Library
//!
//! Wraps the external transcoding engine behind the [`Transcoder`] trait and runs
//! conversions through a [`TranscodeWorker`], which owns output naming, input
//! cleanup, timeouts and the optional concurrency bound.

pub mod error;
pub mod traits;
pub mod video;

pub use error::TranscodeError;
pub use traits::Transcoder;
pub use video::{FFmpegTranscoder, TranscodeWorker, WorkerOptions};
