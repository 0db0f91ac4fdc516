//! vidconv Storage Library
//!
//! Filesystem locations for uploaded and converted files.
//!
//! # File layout
//!
//! Two flat directories, both configured at startup:
//!
//! - uploads: `{upload_dir}/{token}.{source_ext}`
//! - converted artifacts: `{converted_dir}/{token}.{target_ext}`
//!
//! Tokens come from a single process-wide [`NameGenerator`] so no path is handed out
//! twice. A converted artifact's public download identifier is its basename; lookups
//! by identifier only ever resolve inside the converted directory.

pub mod error;
pub mod keys;
pub mod local;

pub use error::{StorageError, StorageResult};
pub use keys::NameGenerator;
pub use local::{ArtifactStore, ByteStream};
