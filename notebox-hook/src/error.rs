//! Error types for notebox-hook
//!
//! Every failure leaves the service as `{"status":"error","message":...}`
//! with a matching HTTP status: invalid input 400, missing file 404,
//! oversized body 413, anything else 500.

use axum::{
    extract::rejection::BytesRejection,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notebox_common::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

use crate::archive::ArchiveError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Request body over the configured limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Extraction or packaging failure
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// notebox-common error
    #[error(transparent)]
    Common(#[from] notebox_common::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Common(notebox_common::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Internal(_)
            | ApiError::Io(_)
            | ApiError::Archive(_)
            | ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!("Request failed: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(format!("Failed to parse multipart data: {}", err))
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {}", err))
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
