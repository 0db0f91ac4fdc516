use serde::Serialize;
use std::path::{Path, PathBuf};

/// A file received from a multipart upload and written to the uploads directory.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    /// Filename as sent by the client
    pub original_filename: String,
    /// Location in the uploads directory
    pub stored_path: PathBuf,
    /// Extension of the original filename, lowercase, without the leading dot.
    /// Empty when the original filename has none.
    pub extension: String,
    pub size: u64,
}

impl UploadedFile {
    pub fn new(original_filename: String, stored_path: PathBuf, size: u64) -> Self {
        let extension = extension_of(&original_filename);
        Self {
            original_filename,
            stored_path,
            extension,
            size,
        }
    }

    /// Case-insensitive extension check
    pub fn has_extension(&self, expected: &str) -> bool {
        !self.extension.is_empty()
            && self
                .extension
                .eq_ignore_ascii_case(expected.trim_start_matches('.'))
    }
}

/// Lowercase extension of a client-supplied filename.
///
/// Only the final path segment is considered, so `"a.mov/b"` has no extension.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}
