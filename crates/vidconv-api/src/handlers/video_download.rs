use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use vidconv_core::AppError;
use vidconv_storage::{ArtifactStore, ByteStream, StorageError};

#[utoipa::path(
    get,
    path = "/download/{filename}",
    tag = "video",
    params(
        ("filename" = String, Path, description = "Download identifier from the upload response")
    ),
    responses(
        (status = 200, description = "Converted file; it is deleted once fully sent", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Error while downloading file", body = String, content_type = "text/plain")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn download_video(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    // Names that could leave the converted directory are simply unknown
    let path = state
        .store
        .resolve_artifact(&filename)
        .map_err(|_| AppError::NotFound(filename.clone()))?;

    if !state.store.exists(&path).await {
        return Err(AppError::NotFound(filename).into());
    }

    let size = state
        .store
        .content_length(&path)
        .await
        .map_err(|e| download_error(e, &filename))?;
    let chunks = state
        .store
        .open_stream(&path)
        .await
        .map_err(|e| download_error(e, &filename))?;

    let disposition = attachment_disposition(
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_ATTACHMENT_NAME),
    );

    tracing::info!(size_bytes = size, "Serving artifact");

    let body = Body::from_stream(single_use(chunks, state.store.clone(), path, size).await);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(body)
        .map_err(|e| AppError::DownloadFailed(e.to_string()).into())
}

const DEFAULT_ATTACHMENT_NAME: &str = "download";

fn download_error(err: StorageError, filename: &str) -> AppError {
    match err {
        StorageError::NotFound(_) => AppError::NotFound(filename.to_string()),
        other => AppError::DownloadFailed(other.to_string()),
    }
}

/// `attachment; filename="..."` with quotes and backslashes escaped and control
/// characters dropped.
fn attachment_disposition(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len());
    for c in name.chars().filter(|c| !c.is_control()) {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    if quoted.is_empty() {
        quoted.push_str(DEFAULT_ATTACHMENT_NAME);
    }
    format!("attachment; filename=\"{}\"", quoted)
}

struct Transfer {
    chunks: ByteStream,
    store: ArtifactStore,
    path: PathBuf,
    expected: u64,
    sent: u64,
}

/// Pass `chunks` through and delete the file as soon as `expected` bytes have been
/// read, before the final chunk is handed to the response body.
///
/// A body with a known length is dropped by the server once that many bytes are
/// written, so the end-of-stream poll cannot be relied on. A read error, a short
/// file or a body dropped early leaves the file in place.
async fn single_use(
    chunks: ByteStream,
    store: ArtifactStore,
    path: PathBuf,
    expected: u64,
) -> impl Stream<Item = Result<Bytes, StorageError>> + Send + 'static {
    // Nothing will ever be polled for an empty body
    if expected == 0 {
        store.discard(&path).await;
        tracing::info!(path = %path.display(), "Empty artifact delivered");
    }

    let transfer = Transfer {
        chunks,
        store,
        path,
        expected,
        sent: 0,
    };

    futures::stream::unfold(Some(transfer), |state| async move {
        let mut transfer = state?;
        match transfer.chunks.next().await {
            Some(Ok(bytes)) => {
                transfer.sent += bytes.len() as u64;
                if transfer.sent >= transfer.expected {
                    transfer.store.discard(&transfer.path).await;
                    tracing::info!(
                        path = %transfer.path.display(),
                        size_bytes = transfer.sent,
                        "Artifact delivered"
                    );
                    return Some((Ok(bytes), None));
                }
                Some((Ok(bytes), Some(transfer)))
            }
            Some(Err(e)) => {
                tracing::error!(
                    error = %e,
                    path = %transfer.path.display(),
                    "Download interrupted, artifact kept"
                );
                Some((Err(e), None))
            }
            None => {
                tracing::warn!(
                    path = %transfer.path.display(),
                    sent = transfer.sent,
                    expected = transfer.expected,
                    "Artifact shorter than announced, kept"
                );
                None
            }
        }
    })
}
