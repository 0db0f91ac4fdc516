//! vidconv API Library
//!
//! HTTP handlers, application state and server setup for the upload-convert-download
//! service.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::HttpAppError;
pub use handlers::video_upload::{UploadForm, UploadResponse};
