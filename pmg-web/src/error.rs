//! Error pages
//!
//! A failed API call becomes an error page carrying a flash message. An
//! unauthorized call instead drops the stored API key and sends the
//! visitor to the login page.

use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::client::ClientError;
use crate::html;
use crate::session::API_KEY_COOKIE;

/// API failure while rendering the page at `path`
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct WebError {
    #[source]
    pub source: ClientError,
    pub path: String,
}

impl WebError {
    pub fn new(source: ClientError, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
        }
    }

    /// Flash message shown on the error page.
    pub fn flash(&self) -> String {
        match &self.source {
            ClientError::Api { status, message } => format!("{} ({})", message, status),
            other => other.to_string(),
        }
    }

    /// Login URL that brings the visitor back here afterwards.
    pub fn login_redirect(&self) -> String {
        format!("/login?next={}", urlencoding::encode(&self.path))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self.source {
            ClientError::Api { status: 401, message } => {
                tracing::info!(path = %self.path, message = %message, "API rejected credentials");
                return (
                    StatusCode::FOUND,
                    [
                        (LOCATION, self.login_redirect()),
                        (SET_COOKIE, format!("{}=; Path=/; Max-Age=0", API_KEY_COOKIE)),
                    ],
                )
                    .into_response();
            }
            ClientError::Connection(e) => {
                tracing::error!(path = %self.path, error = %e, "Backend unreachable");
                StatusCode::BAD_GATEWAY
            }
            ClientError::Api { .. } | ClientError::Response(_) => {
                tracing::error!(path = %self.path, "API error: {}", self.source);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = html::layout(
            "Error",
            &[self.flash()],
            "<h1>Something went wrong</h1>\n<p>Please try again later.</p>\n",
        );
        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, message: &str) -> WebError {
        WebError::new(
            ClientError::Api {
                status,
                message: message.to_string(),
            },
            "/committee/12/",
        )
    }

    #[test]
    fn flash_includes_status() {
        assert_eq!(api_error(404, "committee '12' not found").flash(), "committee '12' not found (404)");
    }

    #[test]
    fn unauthorized_redirects_to_login() {
        let response = api_error(401, "unknown API key").into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/login?next=%2Fcommittee%2F12%2F"
        );
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("api_key=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn other_errors_render_500_page() {
        let response = api_error(500, "an internal error occurred").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
