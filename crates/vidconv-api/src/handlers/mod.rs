pub mod health;
pub mod video_download;
pub mod video_upload;
