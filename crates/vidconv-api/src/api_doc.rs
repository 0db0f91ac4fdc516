//! OpenAPI documentation, served as JSON at `/api/openapi.json` and rendered by
//! RapiDoc at `/api-docs`.

use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "vidconv API",
        version = "0.1.0",
        description = "Upload a QuickTime (.mov) video, receive it converted to MP4 through a download link that works once."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::video_download::download_video,
    ),
    components(schemas(handlers::video_upload::UploadResponse)),
    tags(
        (name = "video", description = "Video conversion")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
