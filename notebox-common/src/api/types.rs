//! Shared API response envelope types
//!
//! Every JSON response carries a `status` of `"success"` or `"error"` and a
//! human-readable `message`.

use serde::{Deserialize, Serialize};

/// Outcome marker in every JSON response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Error response body
///
/// # Examples
///
/// ```
/// use notebox_common::api::types::ErrorResponse;
///
/// let body = ErrorResponse::new("File not found");
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["status"], "error");
/// assert_eq!(json["message"], "File not found");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
        }
    }
}
