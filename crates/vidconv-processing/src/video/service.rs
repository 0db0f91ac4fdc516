//! FFmpegTranscoder - container/codec conversion through the ffmpeg binary.

use crate::traits::Transcoder;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Longest stderr excerpt carried into an error message
const STDERR_TAIL_CHARS: usize = 1000;

#[derive(Debug, Clone)]
pub struct FFmpegTranscoder {
    ffmpeg_path: String,
}

impl FFmpegTranscoder {
    pub fn new(ffmpeg_path: String) -> Result<Self> {
        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if ffmpeg_path.trim().is_empty() {
            return Err(anyhow!("Invalid ffmpeg_path: empty"));
        }
        if ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c)) {
            return Err(anyhow!(
                "Invalid ffmpeg_path: contains dangerous characters"
            ));
        }

        Ok(Self { ffmpeg_path })
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    /// First line of `ffmpeg -version`, used as a startup availability check.
    pub async fn version(&self) -> Result<String> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", self.ffmpeg_path))?;

        if !output.status.success() {
            return Err(anyhow!("{} -version exited with {}", self.ffmpeg_path, output.status));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }
}

#[async_trait]
impl Transcoder for FFmpegTranscoder {
    #[tracing::instrument(skip(self, input, output), fields(input = %input.display(), output = %output.display()))]
    async fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        // -n: never overwrite; output paths are unique so an existing file is a bug
        let result = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-n", "-i"])
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", self.ffmpeg_path))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(anyhow!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr_tail(&stderr)
            ));
        }

        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    if count <= STDERR_TAIL_CHARS {
        return trimmed.to_string();
    }
    trimmed.chars().skip(count - STDERR_TAIL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_dangerous_paths() {
        assert!(FFmpegTranscoder::new("ffmpeg; rm -rf /".to_string()).is_err());
        assert!(FFmpegTranscoder::new("$(whoami)".to_string()).is_err());
        assert!(FFmpegTranscoder::new("   ".to_string()).is_err());
        assert!(FFmpegTranscoder::new("/usr/bin/ffmpeg".to_string()).is_ok());
    }

    #[test]
    fn test_stderr_tail_keeps_end() {
        let long = format!("{}END", "x".repeat(5000));
        let tail = stderr_tail(&long);
        assert_eq!(tail.chars().count(), STDERR_TAIL_CHARS);
        assert!(tail.ends_with("END"));
        assert_eq!(stderr_tail("  short \n"), "short");
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_error() {
        let transcoder =
            FFmpegTranscoder::new("/nonexistent/vidconv-ffmpeg".to_string()).unwrap();
        let err = transcoder
            .transcode(Path::new("in.mov"), Path::new("out.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to execute"));
        assert!(transcoder.version().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let transcoder = FFmpegTranscoder::new("false".to_string()).unwrap();
        let err = transcoder
            .transcode(Path::new("in.mov"), Path::new("out.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ffmpeg exited with"));
    }
}
