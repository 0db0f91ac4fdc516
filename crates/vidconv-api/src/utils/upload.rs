//! Multipart upload intake and download-link construction

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use vidconv_core::{AppError, UploadedFile};
use vidconv_storage::{keys::sanitize_extension, ArtifactStore};

/// Multipart field carrying the video
pub const VIDEO_FIELD: &str = "video";

/// Stream the `video` file field of `multipart` into the uploads directory.
///
/// Returns `Ok(None)` when the form has no such file field. Other fields are skipped.
/// On any error the partially written file is removed.
pub async fn receive_video(
    mut multipart: Multipart,
    store: &ArtifactStore,
) -> Result<Option<UploadedFile>, AppError> {
    let mut received: Option<UploadedFile> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                if let Some(upload) = &received {
                    store.discard(&upload.stored_path).await;
                }
                return Err(multipart_error(e));
            }
        };

        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        // A text part under the file field name is not a file
        let Some(original_filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        if let Some(upload) = received.take() {
            store.discard(&upload.stored_path).await;
            return Err(AppError::InvalidInput(format!(
                "Only one '{}' file is accepted per request",
                VIDEO_FIELD
            )));
        }

        received = Some(store_field(field, original_filename, store).await?);
    }

    Ok(received)
}

async fn store_field(
    mut field: Field<'_>,
    original_filename: String,
    store: &ArtifactStore,
) -> Result<UploadedFile, AppError> {
    let extension = Path::new(&original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(sanitize_extension)
        .unwrap_or_default();

    let (path, mut file) = store
        .create_upload_file(&extension)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut size: u64 = 0;
    let written: Result<(), AppError> = async {
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(())
    }
    .await;
    drop(file);

    if let Err(e) = written {
        store.discard(&path).await;
        return Err(e);
    }

    tracing::info!(
        original_filename = %original_filename,
        path = %path.display(),
        size_bytes = size,
        "Upload stored"
    );

    Ok(UploadedFile::new(original_filename, path, size))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Absolute download URL for an artifact, as seen by the requesting client.
///
/// Scheme comes from `X-Forwarded-Proto` (http or https only), falling back to http.
/// Host comes from the `Host` header, then the request URI authority, then
/// `localhost:{fallback_port}`.
pub fn download_link(headers: &HeaderMap, uri: &Uri, fallback_port: u16, download_id: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https"))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "http".to_string());

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_else(|| format!("localhost:{}", fallback_port));

    format!("{}://{}/download/{}", scheme, host, download_id)
}
