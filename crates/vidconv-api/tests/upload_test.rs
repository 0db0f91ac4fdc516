//! Upload endpoint integration tests.
//!
//! Run with: `cargo test -p vidconv-api --test upload_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::fixtures::{fake_mov_bytes, video_form, CONVERTED_BYTES};
use helpers::{download_id, files_in, setup_test_app, StubTranscoder};
use serde_json::Value;

#[tokio::test]
async fn test_upload_mov_returns_download_link() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub.clone()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(video_form("clip.MOV", fake_mov_bytes()))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let link = body["downloadLink"].as_str().unwrap();
    assert!(link.starts_with("http://"));
    assert!(link.contains("/download/"));

    let id = download_id(link);
    assert!(id.ends_with(".mp4"));
    assert_eq!(files_in(&app.converted_dir()), vec![id.clone()]);
    assert_eq!(
        std::fs::read(app.converted_dir().join(&id)).unwrap(),
        CONVERTED_BYTES
    );
    assert!(files_in(&app.upload_dir()).is_empty());
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_upload_wrong_extension_is_rejected() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub.clone()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(video_form("clip.avi", fake_mov_bytes()))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "File must be in .mov format");
    assert!(files_in(&app.upload_dir()).is_empty());
    assert!(files_in(&app.converted_dir()).is_empty());
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_upload_without_extension_is_rejected() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub.clone()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(video_form("clip", fake_mov_bytes()))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "File must be in .mov format");
    assert!(files_in(&app.upload_dir()).is_empty());
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub.clone()).await;

    let form = MultipartForm::new().add_text("title", "holiday");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "File is missing");
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_upload_text_field_named_video_is_not_a_file() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub.clone()).await;

    let form = MultipartForm::new().add_text("video", "not a file");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "File is missing");
    assert!(files_in(&app.upload_dir()).is_empty());
}

#[tokio::test]
async fn test_upload_non_multipart_body() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub.clone()).await;

    let response = app
        .client()
        .post("/upload")
        .json(&serde_json::json!({ "video": "clip.mov" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "File is missing");
}

#[tokio::test]
async fn test_upload_ignores_unrelated_fields() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub.clone()).await;

    let form = video_form("holiday.mov", fake_mov_bytes()).add_text("title", "holiday");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(files_in(&app.converted_dir()).len(), 1);
}

#[tokio::test]
async fn test_upload_conversion_failure_keeps_input() {
    let stub = StubTranscoder::failing("Invalid data found when processing input");
    let app = setup_test_app(stub.clone()).await;

    let data = fake_mov_bytes();
    let response = app
        .client()
        .post("/upload")
        .multipart(video_form("broken.mov", data.clone()))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.text(),
        "Conversion error: Error during conversion: Invalid data found when processing input"
    );

    let uploads = files_in(&app.upload_dir());
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].ends_with(".mov"));
    assert_eq!(std::fs::read(app.upload_dir().join(&uploads[0])).unwrap(), data);
    assert!(files_in(&app.converted_dir()).is_empty());
}

#[tokio::test]
async fn test_download_link_follows_request_host() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub).await;

    let response = app
        .client()
        .post("/upload")
        .add_header("host", "videos.example.com")
        .add_header("x-forwarded-proto", "https")
        .multipart(video_form("clip.mov", fake_mov_bytes()))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let link = body["downloadLink"].as_str().unwrap();
    assert!(link.starts_with("https://videos.example.com/download/"));
}

#[tokio::test]
async fn test_concurrent_uploads_get_distinct_links() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = setup_test_app(stub.clone()).await;
    let client = app.client();

    let requests = (0..5).map(|i| {
        client
            .post("/upload")
            .multipart(video_form(&format!("clip{}.mov", i), fake_mov_bytes()))
    });
    let responses = futures::future::join_all(requests.map(|r| async move { r.await })).await;

    let mut ids: Vec<String> = responses
        .iter()
        .map(|response| {
            assert_eq!(response.status_code(), 200);
            let body: Value = response.json();
            download_id(body["downloadLink"].as_str().unwrap())
        })
        .collect();
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 5);
    assert_eq!(files_in(&app.converted_dir()), ids);
    assert!(files_in(&app.upload_dir()).is_empty());
    assert_eq!(stub.call_count(), 5);
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let stub = StubTranscoder::succeeding(CONVERTED_BYTES);
    let app = helpers::setup_test_app_with(stub.clone(), |config| {
        config.max_upload_size_bytes = 1024;
    })
    .await;

    let response = app
        .client()
        .post("/upload")
        .multipart(video_form("big.mov", vec![0u8; 64 * 1024]))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(files_in(&app.upload_dir()).is_empty());
    assert_eq!(stub.call_count(), 0);
}
