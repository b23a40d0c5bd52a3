//! # Notebox Common Library
//!
//! Shared code for the notebox services:
//! - Error types
//! - Bootstrap configuration and upload folder resolution
//! - API response envelope types

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
