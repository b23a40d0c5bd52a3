//! Shared API types

pub mod types;

pub use types::{ErrorResponse, ResponseStatus};
