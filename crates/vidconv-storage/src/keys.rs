//! Unique file name generation.
//!
//! Names are `{token}.{ext}` where the token is a millisecond timestamp that is bumped
//! past the previously issued token whenever two requests land in the same
//! millisecond (or the clock steps backwards). Tokens are therefore strictly
//! increasing for the lifetime of the process.

use std::sync::atomic::{AtomicI64, Ordering};

const MAX_EXTENSION_LEN: usize = 16;

#[derive(Debug, Default)]
pub struct NameGenerator {
    last: AtomicI64,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next token: `max(now_ms, previous + 1)`.
    pub fn next_token(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// `{token}.{ext}`, or just `{token}` when the sanitized extension is empty.
    pub fn next_file_name(&self, extension: &str) -> String {
        let token = self.next_token();
        let ext = sanitize_extension(extension);
        if ext.is_empty() {
            token.to_string()
        } else {
            format!("{}.{}", token, ext)
        }
    }
}

/// Lowercase ASCII alphanumerics only. Anything else in a client-supplied extension
/// is dropped so it can never form a path component.
pub fn sanitize_extension(extension: &str) -> String {
    extension
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXTENSION_LEN)
        .collect::<String>()
        .to_ascii_lowercase()
}
