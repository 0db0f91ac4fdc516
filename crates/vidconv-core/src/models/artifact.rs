use serde::Serialize;
use std::path::PathBuf;

/// A converted file waiting in the converted-output directory to be downloaded once.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedArtifact {
    pub path: PathBuf,
    /// Public download identifier: the basename of `path`
    pub download_id: String,
}

impl ConvertedArtifact {
    /// Returns `None` when `path` has no UTF-8 basename.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let download_id = path.file_name()?.to_str()?.to_string();
        Some(Self { path, download_id })
    }
}
