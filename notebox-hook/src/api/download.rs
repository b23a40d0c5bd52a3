//! Download responder
//!
//! `POST /download-zip` with `{"filename": "..."}` streams a stored file
//! back as an attachment. Any file in the upload folder can be requested by
//! name; there is no ownership check.

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::path::Path;
use tokio_util::io::ReaderStream;
use tracing::info;

use super::parse_json;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// JSON body of a download request
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub filename: Option<String>,
}

/// POST /download-zip
pub async fn download_zip(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Response> {
    let body = body?;
    let request: DownloadRequest = parse_json(&body)?;

    let filename = request
        .filename
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing filename in request".to_string()))?;

    let path = match state.store.existing(&filename).await {
        Ok(path) => path,
        Err(notebox_common::Error::NotFound(_)) => {
            return Err(ApiError::NotFound("File not found".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let file = tokio::fs::File::open(&path).await?;
    let length = file.metadata().await?.len();
    info!("Sending zip file: {} ({} bytes)", path.display(), length);

    let headers = [
        (CONTENT_TYPE, content_type_for(&filename).to_string()),
        (CONTENT_LENGTH, length.to_string()),
        (CONTENT_DISPOSITION, attachment_disposition(&filename)),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

fn content_type_for(filename: &str) -> &'static str {
    if filename.to_ascii_lowercase().ends_with(".zip") {
        "application/zip"
    } else {
        "application/octet-stream"
    }
}

/// `attachment; filename="<base name>"`
fn attachment_disposition(filename: &str) -> String {
    let download_name = Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    format!(
        "attachment; filename=\"{}\"",
        download_name.replace('\\', "\\\\").replace('"', "\\\"")
    )
}
