//! Request payloads for upload tests

use axum_test::multipart::{MultipartForm, Part};

/// Enough of a QuickTime header to look like a .mov; the stub transcoder never parses it.
pub fn fake_mov_bytes() -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x14];
    data.extend_from_slice(b"ftypqt  ");
    data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    data.extend_from_slice(b"qt  ");
    data.extend(std::iter::repeat(0xAB).take(4096));
    data
}

pub const CONVERTED_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42converted-output";

pub fn video_form(file_name: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(data)
            .file_name(file_name)
            .mime_type("video/quicktime"),
    )
}
