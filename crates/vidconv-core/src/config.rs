//! Configuration module
//!
//! Process-wide settings (listen port, storage directories, source/target formats,
//! transcoder binary and conversion limits) are collected into a single [`Config`]
//! that is built once at startup and handed to each component's constructor.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SERVER_PORT: u16 = 3000;
const STORAGE_ROOT: &str = "data";
const FFMPEG_PATH: &str = "ffmpeg";
const SOURCE_EXTENSION: &str = "mov";
const TARGET_EXTENSION: &str = "mp4";
const MAX_UPLOAD_SIZE_MB: usize = 500;
const ARTIFACT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Directory that receives multipart uploads before conversion
    pub upload_dir: PathBuf,
    /// Directory that holds converted artifacts until they are downloaded
    pub converted_dir: PathBuf,
    pub ffmpeg_path: String,
    /// Accepted source extension, lowercase, without the leading dot
    pub source_extension: String,
    /// Output extension, lowercase, without the leading dot
    pub target_extension: String,
    pub max_upload_size_bytes: usize,
    /// 0 = unbounded
    pub max_concurrent_conversions: usize,
    /// 0 = no timeout
    pub conversion_timeout_secs: u64,
    /// Age after which an unclaimed artifact is swept. 0 = sweep disabled.
    pub artifact_ttl_secs: u64,
    pub artifact_sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_root =
            PathBuf::from(env::var("STORAGE_ROOT").unwrap_or_else(|_| STORAGE_ROOT.to_string()));
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| storage_root.join("uploads"));
        let converted_dir = env::var("CONVERTED_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| storage_root.join("converted"));

        let max_upload_size_mb = parse_env("MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port: parse_env("PORT", SERVER_PORT),
            environment,
            cors_origins,
            upload_dir,
            converted_dir,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| FFMPEG_PATH.to_string()),
            source_extension: normalize_extension(
                &env::var("SOURCE_EXTENSION").unwrap_or_else(|_| SOURCE_EXTENSION.to_string()),
            ),
            target_extension: normalize_extension(
                &env::var("TARGET_EXTENSION").unwrap_or_else(|_| TARGET_EXTENSION.to_string()),
            ),
            max_upload_size_bytes: max_upload_size_mb.saturating_mul(1024 * 1024),
            max_concurrent_conversions: parse_env("MAX_CONCURRENT_CONVERSIONS", 0),
            conversion_timeout_secs: parse_env("CONVERSION_TIMEOUT_SECS", 0),
            artifact_ttl_secs: parse_env("ARTIFACT_TTL_SECS", 0),
            artifact_sweep_interval_secs: parse_env(
                "ARTIFACT_SWEEP_INTERVAL_SECS",
                ARTIFACT_SWEEP_INTERVAL_SECS,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Defaults with both storage directories placed under `root`.
    pub fn with_storage_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Config {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            upload_dir: root.join("uploads"),
            converted_dir: root.join("converted"),
            ffmpeg_path: FFMPEG_PATH.to_string(),
            source_extension: SOURCE_EXTENSION.to_string(),
            target_extension: TARGET_EXTENSION.to_string(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            max_concurrent_conversions: 0,
            conversion_timeout_secs: 0,
            artifact_ttl_secs: 0,
            artifact_sweep_interval_secs: ARTIFACT_SWEEP_INTERVAL_SECS,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        if self.source_extension.is_empty() || self.target_extension.is_empty() {
            return Err(anyhow::anyhow!(
                "SOURCE_EXTENSION and TARGET_EXTENSION must not be empty"
            ));
        }
        if self.source_extension == self.target_extension {
            return Err(anyhow::anyhow!(
                "SOURCE_EXTENSION and TARGET_EXTENSION must differ (both are '{}')",
                self.source_extension
            ));
        }
        if self.upload_dir == self.converted_dir {
            return Err(anyhow::anyhow!(
                "UPLOAD_DIR and CONVERTED_DIR must be different directories"
            ));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.artifact_ttl_secs > 0 && self.artifact_sweep_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "ARTIFACT_SWEEP_INTERVAL_SECS must be greater than 0 when ARTIFACT_TTL_SECS is set"
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn conversion_timeout(&self) -> Option<Duration> {
        (self.conversion_timeout_secs > 0).then(|| Duration::from_secs(self.conversion_timeout_secs))
    }

    pub fn artifact_ttl(&self) -> Option<Duration> {
        (self.artifact_ttl_secs > 0).then(|| Duration::from_secs(self.artifact_ttl_secs))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// `".MOV"` -> `"mov"`
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
