//! HTTP API handlers for notebox-hook

pub mod download;
pub mod health;
pub mod webhook;

pub use download::download_zip;
pub use health::health_routes;
pub use webhook::{handle_test_webhook, handle_webhook};

use axum::http::{header::CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

/// Content type without parameters, lowercased (`"application/json"`)
pub(crate) fn mime_essence(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or_default().trim();
    Some(essence.to_ascii_lowercase())
}

/// `application/json` or any `application/*+json` type
pub(crate) fn is_json(headers: &HeaderMap) -> bool {
    match mime_essence(headers) {
        Some(essence) => {
            essence == "application/json"
                || (essence.starts_with("application/") && essence.ends_with("+json"))
        }
        None => false,
    }
}

/// Parse a JSON request body into a typed schema
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn essence_strips_parameters() {
        let headers = headers_with("Application/JSON; charset=utf-8");
        assert_eq!(mime_essence(&headers).as_deref(), Some("application/json"));
    }

    #[test]
    fn json_detection() {
        assert!(is_json(&headers_with("application/json")));
        assert!(is_json(&headers_with("application/vnd.api+json")));
        assert!(!is_json(&headers_with("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }
}
