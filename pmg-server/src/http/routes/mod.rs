//! Route handlers organized by resource

pub mod bills;
pub mod committees;
pub mod health;
pub mod meetings;
pub mod members;
pub mod proceedings;
pub mod questions;
pub mod reports;
pub mod search;

use super::error::ApiError;

/// Fallback for unknown paths
pub async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound {
        resource: "resource",
        id: uri.path().to_string(),
    }
}
