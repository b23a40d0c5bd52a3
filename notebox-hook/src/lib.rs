//! notebox-hook library
//!
//! Webhook service that receives zip uploads or playlist notes requests and
//! keeps the resulting archives in a single upload folder for download.
//! Exposes the router so integration tests can drive it without a socket.

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod notes;
pub mod storage;

pub use crate::error::{ApiError, ApiResult};

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::storage::UploadStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Upload folder holding received and generated archives
    pub store: UploadStore,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: UploadStore, max_upload_bytes: usize) -> Self {
        Self {
            store,
            max_upload_bytes,
            startup_time: Utc::now(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            UploadStore::new(config.upload_folder.clone()),
            config.max_upload_bytes,
        )
    }
}

/// Build application router
///
/// CORS is open to any origin on `/webhook` only, where browser forms post.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    let webhook = Router::new()
        .route("/webhook", post(api::handle_webhook))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Router::new()
        .merge(webhook)
        .route("/webhook-test", post(api::handle_test_webhook))
        .route("/download-zip", post(api::download_zip))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
