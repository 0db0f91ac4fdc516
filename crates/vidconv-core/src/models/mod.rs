//! Domain models for the upload → convert → download lifecycle.

mod artifact;
mod job;
mod upload;

pub use artifact::ConvertedArtifact;
pub use job::{ConversionJob, JobStatus};
pub use upload::UploadedFile;
