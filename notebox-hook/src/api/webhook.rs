//! Webhook dispatcher
//!
//! `POST /webhook` accepts three kinds of body, chosen by content type:
//!
//! 1. `multipart/form-data` with a `file` part: a zip upload
//! 2. `application/zip`: a raw zip body, named by `Content-Disposition`
//! 3. `application/json` with `email` + `playlistUrl`: build a notes archive
//!
//! Anything else is rejected with 400. Uploads are stored in the upload
//! folder and extracted next to themselves; notes archives are written to
//! the same folder for later `/download-zip` requests.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Multipart, Request, State},
    http::{header::CONTENT_DISPOSITION, HeaderMap},
    Json,
};
use notebox_common::api::ResponseStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

use super::{is_json, mime_essence, parse_json};
use crate::archive::{extract_archive, package_notes};
use crate::error::{ApiError, ApiResult};
use crate::notes::{notes_zip_filename, synthesize_notes};
use crate::AppState;

/// Filename for raw zip bodies without a usable `Content-Disposition`
pub const DEFAULT_RAW_FILENAME: &str = "file.zip";

/// Suffix required of uploaded filenames
pub const ARCHIVE_SUFFIX: &str = ".zip";

// ============================================================================
// Request/Response Types
// ============================================================================

/// JSON body of a notes request
///
/// Both fields are optional at the schema level so that a missing field
/// reports the same message as an empty one.
#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, rename = "playlistUrl")]
    pub playlist_url: Option<String>,
}

impl NotesRequest {
    /// Require both fields present and non-empty
    pub fn into_fields(self) -> ApiResult<(String, String)> {
        match (self.email, self.playlist_url) {
            (Some(email), Some(playlist_url)) if !email.is_empty() && !playlist_url.is_empty() => {
                Ok((email, playlist_url))
            }
            _ => Err(ApiError::BadRequest(
                "Missing required fields: email and playlistUrl".to_string(),
            )),
        }
    }
}

/// Success body for `/webhook`
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: ResponseStatus,
    pub message: String,

    /// Stored upload name (zip branches)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Generated archive name (notes branch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_filename: Option<String>,

    /// Where to fetch the generated archive (notes branch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl WebhookResponse {
    fn stored(message: &str, filename: String) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.to_string(),
            filename: Some(filename),
            zip_filename: None,
            download_url: None,
        }
    }
}

/// Success body for `/webhook-test`
#[derive(Debug, Serialize, Deserialize)]
pub struct TestWebhookResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub data: Option<Value>,
}

/// Which branch a request body takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebhookBody {
    Multipart,
    RawZip,
    Json,
    Unsupported,
}

impl WebhookBody {
    fn classify(headers: &HeaderMap) -> Self {
        match mime_essence(headers).as_deref() {
            Some("multipart/form-data") => WebhookBody::Multipart,
            Some("application/zip") => WebhookBody::RawZip,
            Some("application/json") => WebhookBody::Json,
            _ => WebhookBody::Unsupported,
        }
    }
}

fn unsupported_body() -> ApiError {
    ApiError::BadRequest("No file or invalid content type received".to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /webhook
pub async fn handle_webhook(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<WebhookResponse>> {
    let branch = WebhookBody::classify(request.headers());
    info!(
        "Received webhook request with content type: {:?}",
        mime_essence(request.headers())
    );
    debug!("Request headers: {:?}", request.headers());

    match branch {
        WebhookBody::Multipart => {
            let multipart = Multipart::from_request(request, &state).await?;
            let (filename, bytes) = read_file_part(multipart).await?.ok_or_else(unsupported_body)?;
            store_and_extract(&state, &filename, &bytes).await?;

            Ok(Json(WebhookResponse::stored(
                "Zip file received and processed successfully",
                filename,
            )))
        }
        WebhookBody::RawZip => {
            info!("Received raw zip file in request body");
            let filename = raw_zip_filename(request.headers());
            let bytes = Bytes::from_request(request, &state).await?;
            store_and_extract(&state, &filename, &bytes).await?;

            Ok(Json(WebhookResponse::stored(
                "Raw zip file received and processed successfully",
                filename,
            )))
        }
        WebhookBody::Json => {
            let body = Bytes::from_request(request, &state).await?;
            let notes_request: NotesRequest = parse_json(&body)?;
            debug!("Received JSON data: {:?}", notes_request);

            let (email, playlist_url) = notes_request.into_fields()?;
            let zip_filename = create_notes_archive(&state, &email, &playlist_url).await?;

            Ok(Json(WebhookResponse {
                status: ResponseStatus::Success,
                message: "Notes created successfully".to_string(),
                filename: None,
                zip_filename: Some(zip_filename),
                download_url: Some("/download-zip".to_string()),
            }))
        }
        WebhookBody::Unsupported => Err(unsupported_body()),
    }
}

/// POST /webhook-test
///
/// Diagnostic echo: JSON bodies come back under `data`, anything else
/// yields `data: null`. A JSON content type with an unparseable body is a
/// 400. No state changes.
pub async fn handle_test_webhook(
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<TestWebhookResponse>> {
    let body = body?;
    info!("Received test webhook request");
    debug!("Request data: {}", String::from_utf8_lossy(&body));

    let data = if is_json(&headers) {
        Some(parse_json::<Value>(&body)?)
    } else {
        None
    };

    Ok(Json(TestWebhookResponse {
        status: ResponseStatus::Success,
        message: "Webhook test successful".to_string(),
        data,
    }))
}

// ============================================================================
// Branch helpers
// ============================================================================

/// Find the `file` part and read it
///
/// The filename is checked before the part body is read, so a rejected
/// upload never reaches the upload folder. Other parts are skipped.
async fn read_file_part(mut multipart: Multipart) -> ApiResult<Option<(String, Bytes)>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        info!("Received file: {}", filename);

        if !filename.ends_with(ARCHIVE_SUFFIX) {
            return Err(ApiError::BadRequest("Only zip files are accepted".to_string()));
        }

        let bytes = field.bytes().await?;
        return Ok(Some((filename, bytes)));
    }

    Ok(None)
}

/// Filename for a raw zip body
///
/// Taken from the `filename` parameter of `Content-Disposition`; falls back
/// to [`DEFAULT_RAW_FILENAME`].
pub fn raw_zip_filename(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(disposition_filename)
        .unwrap_or_else(|| DEFAULT_RAW_FILENAME.to_string())
}

fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').find_map(|param| {
        let (key, val) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let val = val.trim().trim_matches('"');
        (!val.is_empty()).then(|| val.to_string())
    })
}

async fn store_and_extract(state: &AppState, filename: &str, bytes: &[u8]) -> ApiResult<PathBuf> {
    let path = state.store.save(filename, bytes).await?;
    info!("Saved zip file to: {}", path.display());

    let archive_path = path.clone();
    let destination = state.store.root().to_path_buf();
    let report =
        tokio::task::spawn_blocking(move || extract_archive(&archive_path, &destination)).await??;
    debug!("Extracted {} entries", report.entries.len());

    Ok(path)
}

async fn create_notes_archive(
    state: &AppState,
    email: &str,
    playlist_url: &str,
) -> ApiResult<String> {
    let bundle = synthesize_notes(playlist_url, email);
    let zip_filename = notes_zip_filename(email);
    let zip_path = state.store.path_for(&zip_filename);

    let target = zip_path.clone();
    tokio::task::spawn_blocking(move || package_notes(&bundle, &target)).await??;
    info!("Zip file created: {}", zip_path.display());

    Ok(zip_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::CONTENT_TYPE, HeaderValue};

    fn headers_with(name: axum::http::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn classify_by_content_type() {
        let cases = [
            ("multipart/form-data; boundary=xyz", WebhookBody::Multipart),
            ("application/zip", WebhookBody::RawZip),
            ("application/json", WebhookBody::Json),
            ("application/json; charset=utf-8", WebhookBody::Json),
            ("text/plain", WebhookBody::Unsupported),
        ];
        for (content_type, expected) in cases {
            assert_eq!(
                WebhookBody::classify(&headers_with(CONTENT_TYPE, content_type)),
                expected,
                "{}",
                content_type
            );
        }
        assert_eq!(WebhookBody::classify(&HeaderMap::new()), WebhookBody::Unsupported);
    }

    #[test]
    fn raw_filename_from_disposition() {
        let headers = headers_with(CONTENT_DISPOSITION, "attachment; filename=\"lecture.zip\"");
        assert_eq!(raw_zip_filename(&headers), "lecture.zip");

        let headers = headers_with(CONTENT_DISPOSITION, "attachment; FILENAME=bare.zip");
        assert_eq!(raw_zip_filename(&headers), "bare.zip");
    }

    #[test]
    fn raw_filename_defaults() {
        assert_eq!(raw_zip_filename(&HeaderMap::new()), DEFAULT_RAW_FILENAME);

        let headers = headers_with(CONTENT_DISPOSITION, "attachment");
        assert_eq!(raw_zip_filename(&headers), DEFAULT_RAW_FILENAME);

        let headers = headers_with(CONTENT_DISPOSITION, "attachment; filename=\"\"");
        assert_eq!(raw_zip_filename(&headers), DEFAULT_RAW_FILENAME);
    }

    #[test]
    fn notes_request_requires_both_fields() {
        let ok: NotesRequest =
            serde_json::from_str(r#"{"email":"a@b.com","playlistUrl":"https://x"}"#).unwrap();
        assert_eq!(
            ok.into_fields().unwrap(),
            ("a@b.com".to_string(), "https://x".to_string())
        );

        for body in [
            r#"{"email":"a@b.com"}"#,
            r#"{"playlistUrl":"https://x"}"#,
            r#"{"email":"","playlistUrl":"https://x"}"#,
            r#"{"email":null,"playlistUrl":"https://x"}"#,
        ] {
            let request: NotesRequest = serde_json::from_str(body).unwrap();
            assert!(matches!(request.into_fields(), Err(ApiError::BadRequest(_))), "{}", body);
        }
    }

    #[test]
    fn notes_request_ignores_extra_fields() {
        let request: NotesRequest = serde_json::from_str(
            r#"{"email":"a@b.com","playlistUrl":"p","timestamp":"2025-08-27T10:00:00Z","userAgent":"x"}"#,
        )
        .unwrap();
        assert!(request.into_fields().is_ok());
    }
}
