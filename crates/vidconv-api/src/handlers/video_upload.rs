use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{download_link, receive_video};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{HeaderMap, Uri},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use vidconv_core::AppError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Absolute URL that serves the converted file exactly once
    #[serde(rename = "downloadLink")]
    pub download_link: String,
}

/// Multipart form accepted by the upload endpoint
#[derive(ToSchema)]
pub struct UploadForm {
    /// The `.mov` file
    #[schema(value_type = String, format = Binary)]
    pub video: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "video",
    request_body(content = inline(UploadForm), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video converted", body = UploadResponse),
        (status = 400, description = "File is missing or not a .mov file", body = String, content_type = "text/plain"),
        (status = 413, description = "Upload too large", body = String, content_type = "text/plain"),
        (status = 500, description = "Conversion error", body = String, content_type = "text/plain")
    )
)]
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    // A body that is not multipart carries no file
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Request is not multipart");
        AppError::MissingFile
    })?;

    let upload = receive_video(multipart, &state.store)
        .await?
        .ok_or(AppError::MissingFile)?;

    if !upload.has_extension(&state.config.source_extension) {
        state.store.discard(&upload.stored_path).await;
        return Err(AppError::UnsupportedFormat {
            expected: state.config.source_extension.clone(),
            actual: upload.original_filename,
        }
        .into());
    }

    let artifact = state
        .worker
        .convert(&upload.stored_path)
        .await
        .map_err(|e| AppError::ConversionFailed(e.to_string()))?;

    let link = download_link(
        &headers,
        &uri,
        state.config.server_port,
        &artifact.download_id,
    );
    tracing::info!(
        original_filename = %upload.original_filename,
        download_id = %artifact.download_id,
        "Upload converted"
    );

    Ok(Json(UploadResponse {
        download_link: link,
    }))
}
