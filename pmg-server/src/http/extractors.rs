//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::{FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use super::server::AppState;
use crate::db::UserRepo;
use crate::models::user::EDITOR_ROLE;
use crate::models::{User, ValidationError};

/// Scheme prefix of the `Authorization` header
const API_KEY_PREFIX: &str = "ApiKey:";

/// Extract and validate a numeric resource id from the path
pub struct ValidId(pub i32);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = id.parse::<i32>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidVariant {
                field: "id",
                value: id.clone(),
            })
        })?;

        Ok(Self(id))
    }
}

/// Pull the key out of an `Authorization: ApiKey:<key>` header value.
pub fn api_key_from_header(value: &str) -> Option<&str> {
    value
        .strip_prefix(API_KEY_PREFIX)
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// The user behind the request's API key, required to hold the editor role
pub struct Editor(pub User);

impl FromRequestParts<Arc<AppState>> for Editor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(api_key_from_header)
            .ok_or(ApiError::Unauthorized {
                reason: "missing API key",
            })?;

        let user = UserRepo::new(&state.pool)
            .find_by_api_key(key)
            .await?
            .ok_or(ApiError::Unauthorized {
                reason: "unknown API key",
            })?;

        if !user.has_role(EDITOR_ROLE) {
            tracing::warn!(user_id = user.id, "Admin access without editor role");
            return Err(ApiError::Forbidden {
                reason: format!("the '{}' role is required", EDITOR_ROLE),
            });
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_key_header() {
        assert_eq!(api_key_from_header("ApiKey:abc123"), Some("abc123"));
        assert_eq!(api_key_from_header("ApiKey: abc123 "), Some("abc123"));
        assert_eq!(api_key_from_header("ApiKey:"), None);
        assert_eq!(api_key_from_header("Bearer abc123"), None);
        assert_eq!(api_key_from_header("apikey:abc123"), None);
    }
}
