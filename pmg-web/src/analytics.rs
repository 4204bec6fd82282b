//! Server-side Google Analytics pageviews
//!
//! Hits are sent from a background task so page rendering never waits on
//! the analytics endpoint.

use pmg_core::{is_bot, Pageview};
use reqwest::Client;

use crate::session::RequestInfo;

/// Measurement protocol endpoint
pub const GA_COLLECT_URL: &str = "https://www.google-analytics.com/collect";

#[derive(Debug, Clone)]
pub struct PageviewTracker {
    http: Client,
    tracking_id: Option<String>,
    ignore_bots: bool,
    endpoint: String,
}

impl PageviewTracker {
    pub fn new(http: Client, tracking_id: Option<String>) -> Self {
        Self {
            http,
            tracking_id: tracking_id.filter(|id| !id.is_empty()),
            ignore_bots: true,
            endpoint: GA_COLLECT_URL.to_string(),
        }
    }

    pub fn ignore_bots(mut self, ignore: bool) -> Self {
        self.ignore_bots = ignore;
        self
    }

    pub fn endpoint(mut self, url: &str) -> Self {
        self.endpoint = url.to_string();
        self
    }

    /// The hit for this request, or `None` when it should not be tracked.
    pub fn pageview(&self, request: &RequestInfo) -> Option<Pageview> {
        let tracking_id = self.tracking_id.as_deref()?;

        if self.ignore_bots && is_bot(&request.user_agent) {
            return None;
        }

        Some(
            Pageview::new(tracking_id, &request.path, request.ga_cookie.as_deref())
                .remote_ip(request.remote_ip.clone())
                .referrer(request.referrer.as_deref())
                .user_agent(&request.user_agent),
        )
    }

    /// Send a pageview in the background. Returns whether one was sent.
    pub fn track(&self, request: &RequestInfo) -> bool {
        let Some(hit) = self.pageview(request) else {
            return false;
        };

        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        tokio::spawn(async move {
            match http.post(&endpoint).form(&hit).send().await {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(status = %response.status(), path = %hit.dp, "Pageview rejected");
                }
                Ok(_) => tracing::trace!(path = %hit.dp, "Pageview sent"),
                Err(e) => tracing::warn!(error = %e, "Pageview failed"),
            }
        });

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_agent: &str) -> RequestInfo {
        RequestInfo {
            path: "/committee/12/".into(),
            user_agent: user_agent.into(),
            ga_cookie: Some("GA1.2.1760224793.1424413995".into()),
            ..RequestInfo::default()
        }
    }

    #[tokio::test]
    async fn nothing_without_tracking_id() {
        let tracker = PageviewTracker::new(Client::new(), None);
        assert!(!tracker.track(&request("Mozilla/5.0")));

        let tracker = PageviewTracker::new(Client::new(), Some(String::new()));
        assert!(tracker.pageview(&request("Mozilla/5.0")).is_none());
    }

    #[tokio::test]
    async fn bots_are_ignored() {
        let tracker = PageviewTracker::new(Client::new(), Some("UA-1".into()));
        assert!(tracker.pageview(&request("Googlebot/2.1")).is_none());

        let tracker = tracker.ignore_bots(false);
        assert!(tracker.pageview(&request("Googlebot/2.1")).is_some());
    }

    #[tokio::test]
    async fn builds_hit_from_request() {
        let tracker = PageviewTracker::new(Client::new(), Some("UA-1".into()));
        let hit = tracker.pageview(&request("Mozilla/5.0")).unwrap();
        assert_eq!(hit.tid, "UA-1");
        assert_eq!(hit.cid, "1760224793.1424413995");
        assert_eq!(hit.dp, "/committee/12/");
        assert_eq!(hit.ua, "Mozilla/5.0");
    }

    #[tokio::test]
    async fn track_sends_in_background() {
        let tracker = PageviewTracker::new(Client::new(), Some("UA-1".into()))
            .endpoint("http://127.0.0.1:1/collect");
        assert!(tracker.track(&request("Mozilla/5.0")));
    }
}
