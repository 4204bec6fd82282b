//! Backend API client
//!
//! Every page is rendered from one or more JSON documents fetched from the
//! API. Collections come back as `{count, next, results}` envelopes.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Message used when the API gives no reason for a failure
pub const UNSPECIFIED_ERROR: &str = "An unspecified error has occurred.";

/// Maximum number of `next` links followed when collecting everything
const MAX_EXTRA_PAGES: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API answered with a non-200 status
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    /// The API could not be reached
    #[error("Error connecting to backend service.")]
    Connection(#[source] reqwest::Error),

    #[error("invalid response from backend: {0}")]
    Response(#[source] reqwest::Error),
}

impl ClientError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::Connection(e)
        } else {
            Self::Response(e)
        }
    }
}

/// API client, optionally acting for a logged-in user
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    api_host: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// `api_host` is the API root; a trailing slash is added if missing.
    pub fn new(http: Client, api_host: &str) -> Self {
        let mut api_host = api_host.to_string();
        if !api_host.ends_with('/') {
            api_host.push('/');
        }

        Self {
            http,
            api_host,
            api_key: None,
        }
    }

    /// Copy of this client that authenticates with `api_key`.
    pub fn with_api_key(&self, api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
            ..self.clone()
        }
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// URL for a resource, an optional item and an optional page.
    ///
    /// Page 0 is the API's default and is left off.
    pub fn resource_url(&self, resource: &str, id: Option<&str>, page: Option<u32>) -> String {
        let mut url = format!("{}{}/", self.api_host, resource);
        if let Some(id) = id {
            url.push_str(id);
            url.push('/');
        }
        if let Some(page) = page.filter(|p| *p > 0) {
            url.push_str(&format!("?page={}", page));
        }
        url
    }

    /// Fetch a resource from the API.
    ///
    /// With `return_everything`, `next` links are followed and their
    /// `results` appended, and the merged document has no `next` key.
    pub async fn load_from_api(
        &self,
        resource: &str,
        id: Option<&str>,
        page: Option<u32>,
        return_everything: bool,
    ) -> Result<Value, ClientError> {
        let url = self.resource_url(resource, id, page);
        let mut out = self.get_json(&url).await?;

        if return_everything {
            let mut next = next_link(&out);
            let mut followed = 0;

            while let Some(url) = next.take() {
                if followed >= MAX_EXTRA_PAGES {
                    tracing::warn!(resource, "Stopped following next links");
                    break;
                }
                let page = self.get_json(&url).await?;
                append_results(&mut out, &page);
                next = next_link(&page);
                followed += 1;
            }

            if let Value::Object(map) = &mut out {
                map.remove("next");
            }
        }

        Ok(out)
    }

    /// Run a search; `params` are sent as the query string.
    pub async fn search(&self, params: &[(&str, String)]) -> Result<Value, ClientError> {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}search/?{}", self.api_host, query);
        self.get_json(&url).await
    }

    async fn get_json(&self, url: &str) -> Result<Value, ClientError> {
        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("ApiKey:{}", key));
        }

        tracing::debug!(url, "API request");
        let response = request.send().await.map_err(ClientError::from_reqwest)?;
        let status = response.status();

        if status != StatusCode::OK {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| UNSPECIFIED_ERROR.to_string());

            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(ClientError::from_reqwest)
    }
}

fn next_link(doc: &Value) -> Option<String> {
    doc.get("next")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn append_results(out: &mut Value, page: &Value) {
    let Some(more) = page.get("results").and_then(Value::as_array) else {
        return;
    };
    if let Some(results) = out.get_mut("results").and_then(Value::as_array_mut) {
        results.extend(more.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new(Client::new(), "http://api.pmg.test:5001")
    }

    #[test]
    fn builds_resource_urls() {
        let c = client();
        assert_eq!(c.resource_url("committee", None, None), "http://api.pmg.test:5001/committee/");
        assert_eq!(
            c.resource_url("committee", Some("12"), None),
            "http://api.pmg.test:5001/committee/12/"
        );
        assert_eq!(
            c.resource_url("member", None, Some(3)),
            "http://api.pmg.test:5001/member/?page=3"
        );
        assert_eq!(c.resource_url("member", None, Some(0)), "http://api.pmg.test:5001/member/");
    }

    #[test]
    fn empty_api_key_is_ignored() {
        let c = client().with_api_key(Some(""));
        assert!(c.api_key.is_none());
        let c = client().with_api_key(Some("k"));
        assert_eq!(c.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn appends_results() {
        let mut out = json!({"count": 3, "next": "x", "results": [1]});
        append_results(&mut out, &json!({"results": [2, 3], "next": null}));
        assert_eq!(out["results"], json!([1, 2, 3]));
    }

    #[test]
    fn next_link_ignores_null() {
        assert_eq!(next_link(&json!({"next": null})), None);
        assert_eq!(next_link(&json!({"next": "http://a/b/?page=1"})).as_deref(), Some("http://a/b/?page=1"));
    }

    #[test]
    fn error_display_matches_flash() {
        let err = ClientError::Api {
            status: 404,
            message: "committee '9' not found".into(),
        };
        assert_eq!(err.to_string(), "committee '9' not found (404)");
    }
}
