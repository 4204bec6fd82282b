//! Frontend tests against a stub API served on an ephemeral port.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use pmg_core::config::{AnalyticsConfig, WebConfig};
use pmg_web::{build_router, ApiClient, ClientError, WebState};
use reqwest::redirect::Policy;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn committee_list(
    State(base): State<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    match params.get("page").map(String::as_str) {
        Some("1") => Json(json!({
            "count": 3,
            "next": null,
            "results": [{"id": 3, "name": "Health", "house": "National Assembly"}]
        })),
        _ => Json(json!({
            "count": 3,
            "next": format!("{}/committee/?page=1", base),
            "results": [
                {"id": 1, "name": "Finance", "house": "National Assembly"},
                {"id": 2, "name": "Security and Justice", "house": "NCOP"}
            ]
        })),
    }
}

async fn committee_detail(Path(id): Path<i32>) -> impl IntoResponse {
    if id != 1 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "not_found", "message": format!("committee '{}' not found", id)})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": 1,
            "name": "Finance",
            "house": "National Assembly",
            "about": "<p>Oversees the Treasury.</p>",
            "meetings": [{"id": 40, "title": "Budget briefing", "date": "2015-03-02"}],
            "calls_for_comment": [],
            "tabled_reports": [{"title": "Budget report", "start_date": "2015-02-20"}],
            "questions": [{"code": "NW123", "asked_by_name": "A Member", "question": "When?"}],
            "bills": [{"id": 5, "title": "Money Bill", "status": "na"}]
        })),
    )
}

async fn bill_detail(Path(id): Path<i32>) -> Json<Value> {
    if id == 5 {
        Json(json!({"id": 5, "title": "Money Bill", "bill_code": "B5-2015"}))
    } else {
        Json(json!({"id": id, "title": "Old Bill", "status": "lapsed", "events": []}))
    }
}

async fn members() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized", "message": "unknown API key"})),
    )
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    Json(json!({
        "took": 3,
        "hits": {
            "total": 1,
            "max_score": 1.0,
            "hits": [{"id": 40, "content_type": "committee-meeting", "title": format!("About {}", q)}]
        }
    }))
}

/// Stub API; returns its base URL.
async fn stub_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let app = Router::new()
        .route("/committee/", get(committee_list))
        .route("/committee/{id}/", get(committee_detail))
        .route("/bill/{id}/", get(bill_detail))
        .route("/member/", get(members))
        .route("/committee-meeting/", get(broken))
        .route("/search/", get(search))
        .with_state(base.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

async fn frontend(api_host: &str) -> String {
    let web = WebConfig {
        api_host: format!("{}/", api_host),
        ..WebConfig::default()
    };
    let state = WebState::with_client(reqwest::Client::new(), &web, &AnalyticsConfig::default());
    let addr = serve(build_router(state)).await;
    format!("http://{}", addr)
}

fn browser() -> reqwest::Client {
    reqwest::Client::builder().redirect(Policy::none()).build().unwrap()
}

#[tokio::test]
async fn load_from_api_follows_next_links() {
    let api = stub_api().await;
    let client = ApiClient::new(reqwest::Client::new(), &api);

    let all = client.load_from_api("committee", None, None, true).await.unwrap();
    assert_eq!(all["results"].as_array().unwrap().len(), 3);
    assert!(all.get("next").is_none());

    let first = client.load_from_api("committee", None, None, false).await.unwrap();
    assert_eq!(first["results"].as_array().unwrap().len(), 2);
    assert!(first["next"].is_string());
}

#[tokio::test]
async fn api_errors_carry_message_and_status() {
    let api = stub_api().await;
    let client = ApiClient::new(reqwest::Client::new(), &api);

    let err = client.load_from_api("committee", Some("9"), None, false).await.unwrap_err();
    assert_eq!(err.to_string(), "committee '9' not found (404)");

    let err = client.load_from_api("committee-meeting", None, None, false).await.unwrap_err();
    assert_eq!(err.to_string(), "An unspecified error has occurred. (500)");
}

#[tokio::test]
async fn unreachable_api_is_a_connection_error() {
    let client = ApiClient::new(reqwest::Client::new(), "http://127.0.0.1:1/");
    let err = client.load_from_api("committee", None, None, false).await.unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)));
    assert_eq!(err.to_string(), "Error connecting to backend service.");
}

#[tokio::test]
async fn bills_page_lists_sections() {
    let web = frontend(&stub_api().await).await;
    let body = browser().get(format!("{}/bills/", web)).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("Current Bills"));
    assert!(body.contains("Bills Explained"));
}

#[tokio::test]
async fn committee_page_renders_sections() {
    let web = frontend(&stub_api().await).await;
    let response = browser().get(format!("{}/committee/1/", web)).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    for heading in [
        "Committee meetings",
        "Calls for comment",
        "Tabled reports",
        "Questions and replies",
        "Bills",
    ] {
        assert!(body.contains(heading), "missing {}", heading);
    }
    assert!(body.contains("<p>Oversees the Treasury.</p>"));
    assert!(body.contains("NW123"));
    assert!(body.contains("02 Mar 2015"));
}

#[tokio::test]
async fn committees_are_grouped_by_house() {
    let web = frontend(&stub_api().await).await;
    let body = browser().get(format!("{}/committees/", web)).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("National Assembly"));
    assert!(body.contains("NCOP"));
    assert!(body.contains("Health"));
}

#[tokio::test]
async fn missing_committee_flashes_api_message() {
    let web = frontend(&stub_api().await).await;
    let response = browser().get(format!("{}/committee/9/", web)).send().await.unwrap();
    assert_eq!(response.status(), 500);
    let body = response.text().await.unwrap();
    assert!(body.contains("committee &#39;9&#39; not found (404)"));
}

#[tokio::test]
async fn unauthorized_sends_visitor_to_login() {
    let web = frontend(&stub_api().await).await;
    let response = browser()
        .get(format!("{}/members/", web))
        .header("cookie", "api_key=stale")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 302);
    assert_eq!(response.headers()["location"], "/login?next=%2Fmembers%2F");
    let cookie = response.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("api_key=;"));
}

#[tokio::test]
async fn coded_bills_redirect_to_tracker() {
    let web = frontend(&stub_api().await).await;
    let response = browser().get(format!("{}/bill/5/", web)).send().await.unwrap();
    assert_eq!(response.status(), 302);
    assert_eq!(response.headers()["location"], "http://bills.pmg.org.za/bill/B5-2015");

    let response = browser().get(format!("{}/bill/6/", web)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Old Bill"));
}

#[tokio::test]
async fn unreachable_api_renders_bad_gateway() {
    let web = frontend("http://127.0.0.1:1").await;
    let response = browser().get(format!("{}/committees/", web)).send().await.unwrap();
    assert_eq!(response.status(), 502);
    assert!(response.text().await.unwrap().contains("Error connecting to backend service."));
}

#[tokio::test]
async fn search_only_queries_with_terms() {
    let web = frontend(&stub_api().await).await;

    let body = browser().get(format!("{}/search/", web)).send().await.unwrap().text().await.unwrap();
    assert!(!body.contains("results for"));

    let body = browser()
        .get(format!("{}/search/?q=water", web))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("1 results for <strong>water</strong>"));
    assert!(body.contains("/committee-meeting/40/"));
}

#[tokio::test]
async fn login_sets_cookie_and_returns() {
    let web = frontend(&stub_api().await).await;
    let response = browser()
        .post(format!("{}/login", web))
        .form(&[("api_key", "abc-123"), ("next", "/committee/1/")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 302);
    assert_eq!(response.headers()["location"], "/committee/1/");
    let cookie = response.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("api_key=abc-123;"));
}
