//! Per-request visitor details read from headers and cookies

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};

/// Cookie holding the logged-in user's API key
pub const API_KEY_COOKIE: &str = "api_key";

/// Google Analytics client cookie
pub const GA_COOKIE: &str = "_ga";

#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub path: String,
    /// Raw query string, without the `?`
    pub query: String,
    pub api_key: Option<String>,
    pub ga_cookie: Option<String>,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub remote_ip: Option<String>,
}

impl RequestInfo {
    pub fn new(uri: &Uri, headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let remote_ip = header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .filter(|ip| !ip.is_empty())
            .or_else(|| header("x-real-ip"));

        Self {
            path: uri.path().to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            api_key: cookie(headers, API_KEY_COOKIE).filter(|k| !k.is_empty()),
            ga_cookie: cookie(headers, GA_COOKIE),
            user_agent: header("user-agent").unwrap_or_default(),
            referrer: header("referer"),
            remote_ip,
        }
    }
}

impl<S> FromRequestParts<S> for RequestInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new(&parts.uri, &parts.headers))
    }
}

/// Value of the cookie `name`, across all `Cookie` headers.
pub fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn reads_cookies() {
        let h = headers(&[("cookie", "_ga=GA1.2.1760224793.1424413995; api_key=abc")]);
        assert_eq!(cookie(&h, "api_key").as_deref(), Some("abc"));
        assert_eq!(cookie(&h, "_ga").as_deref(), Some("GA1.2.1760224793.1424413995"));
        assert_eq!(cookie(&h, "session"), None);
    }

    #[test]
    fn collects_request_info() {
        let uri: Uri = "/search/1/?q=water".parse().unwrap();
        let h = headers(&[
            ("cookie", "api_key="),
            ("user-agent", "Mozilla/5.0"),
            ("referer", "https://pmg.org.za/"),
            ("x-forwarded-for", "10.0.0.1, 172.16.0.1"),
        ]);

        let info = RequestInfo::new(&uri, &h);
        assert_eq!(info.path, "/search/1/");
        assert_eq!(info.query, "q=water");
        assert_eq!(info.api_key, None);
        assert_eq!(info.user_agent, "Mozilla/5.0");
        assert_eq!(info.referrer.as_deref(), Some("https://pmg.org.za/"));
        assert_eq!(info.remote_ip.as_deref(), Some("10.0.0.1"));
    }
}
