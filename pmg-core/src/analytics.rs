//! Google Analytics measurement-protocol helpers
//!
//! Only the pure parts live here: bot detection, client id extraction and
//! the hit payload. Sending is done by the web frontend.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

/// User agents that are bots
static BOTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(bot|spider|cloudfront|slurp)").expect("valid bot regex"));

pub fn is_bot(user_agent: &str) -> bool {
    BOTS_RE.is_match(user_agent)
}

/// Extract the client id from a `_ga` cookie value.
///
/// `GA1.2.1760224793.1424413995` becomes `1760224793.1424413995`.
pub fn client_id_from_ga_cookie(cookie: &str) -> String {
    cookie
        .splitn(3, '.')
        .last()
        .unwrap_or(cookie)
        .to_string()
}

/// A single pageview hit (measurement protocol v1)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pageview {
    pub v: &'static str,
    pub tid: String,
    pub cid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub t: &'static str,
    pub dp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uip: Option<String>,
    pub dr: String,
    pub ua: String,
}

impl Pageview {
    /// Build a pageview for `path`. A missing `_ga` cookie gets a fresh
    /// random client id.
    pub fn new(tracking_id: &str, path: &str, ga_cookie: Option<&str>) -> Self {
        let cid = ga_cookie
            .map(client_id_from_ga_cookie)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            v: "1",
            tid: tracking_id.to_string(),
            cid,
            uid: None,
            t: "pageview",
            dp: path.to_string(),
            uip: None,
            dr: String::new(),
            ua: String::new(),
        }
    }

    pub fn user_id(mut self, uid: Option<String>) -> Self {
        self.uid = uid;
        self
    }

    pub fn remote_ip(mut self, ip: Option<String>) -> Self {
        self.uip = ip;
        self
    }

    pub fn referrer(mut self, referrer: Option<&str>) -> Self {
        self.dr = referrer.unwrap_or_default().to_string();
        self
    }

    pub fn user_agent(mut self, ua: &str) -> Self {
        self.ua = ua.to_string();
        self
    }
}
