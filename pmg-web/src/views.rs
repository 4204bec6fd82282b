//! Page handlers
//!
//! Each handler loads what it needs from the API and renders HTML. API
//! failures surface as [`WebError`] pages.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::WebError;
use crate::format::pretty_date;
use crate::html::{escape, items, layout, link, section, str_field, text};
use crate::pagination::{num_pages, pagination};
use crate::server::WebState;
use crate::session::{RequestInfo, API_KEY_COOKIE};

/// External bill tracker that owns the bill pages
pub const BILL_TRACKER: &str = "http://bills.pmg.org.za";

/// Content type holding a meeting's report
const MEETING_REPORT: &str = "committee-meeting-report";

/// Links on the bills landing page
const BILL_SECTIONS: [(&str, &str, &str); 6] = [
    ("Current Bills", "/bills/current/", "Weekly update for all current bills."),
    ("All Tabled Bills", "/bill/", "Every bill tabled in Parliament, by year."),
    (
        "Private Member & Committee Bills",
        "/bill/",
        "Bills introduced by individual members and by committees.",
    ),
    ("All Tabled & Draft Bills", "/bill/", "Tabled bills alongside draft bills."),
    ("Draft Bills", "/bill/", "Draft bills published for public comment."),
    ("Bills Explained", "/bills/", "How a bill moves through Parliament."),
];

type PageResult = Result<Html<String>, WebError>;

/// API access on behalf of one request
struct Api<'a> {
    client: ApiClient,
    path: &'a str,
}

impl<'a> Api<'a> {
    fn new(state: &WebState, req: &'a RequestInfo) -> Self {
        Self {
            client: state.client.with_api_key(req.api_key.as_deref()),
            path: &req.path,
        }
    }

    async fn get(&self, resource: &str, id: Option<i32>, page: Option<u32>) -> Result<Value, WebError> {
        let id = id.map(|id| id.to_string());
        self.client
            .load_from_api(resource, id.as_deref(), page, false)
            .await
            .map_err(|e| WebError::new(e, self.path))
    }

    async fn all(&self, resource: &str) -> Result<Value, WebError> {
        self.client
            .load_from_api(resource, None, None, true)
            .await
            .map_err(|e| WebError::new(e, self.path))
    }

    async fn search(&self, params: &[(&str, String)]) -> Result<Value, WebError> {
        self.client
            .search(params)
            .await
            .map_err(|e| WebError::new(e, self.path))
    }
}

fn id_of(doc: &Value) -> i64 {
    doc.get("id").and_then(Value::as_i64).unwrap_or_default()
}

fn title_or<'a>(doc: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    str_field(doc, key).unwrap_or(fallback)
}

fn date_span(doc: &Value, key: &str) -> String {
    match str_field(doc, key) {
        Some(d) => format!(" <span class=\"date\">{}</span>", escape(&pretty_date(d))),
        None => String::new(),
    }
}

/// Stored HTML field, inserted without escaping.
fn raw(doc: &Value, key: &str) -> String {
    str_field(doc, key).unwrap_or_default().to_string()
}

/// Label text and bootstrap class for a bill status.
pub fn bill_status_label(status: &str) -> (String, &'static str) {
    match status {
        "na" | "ncop" => ("in progress".to_string(), "label-primary"),
        "assent" => ("submitted to the president".to_string(), "label-warning"),
        "enacted" => ("signed into law".to_string(), "label-success"),
        other => (other.to_string(), "label-default"),
    }
}

/// Bill type as shown in listings.
pub fn bill_type_label(bill: &Value) -> Option<String> {
    let bill_type = str_field(bill, "type");
    if let Some(t) = bill_type.filter(|t| t.contains("Private Member Bill")) {
        return Some(t.to_string());
    }
    if str_field(bill, "introduced_by").is_some_and(|i| i.contains("Committee")) {
        return Some("Committee Bill".to_string());
    }
    bill_type.map(str::to_string)
}

fn status_badge(bill: &Value) -> String {
    match str_field(bill, "status") {
        Some(status) => {
            let (label, class) = bill_status_label(status);
            format!(" <span class=\"label {}\">{}</span>", class, escape(&label))
        }
        None => String::new(),
    }
}

fn bill_entry(bill: &Value) -> String {
    let mut out = link(
        &format!("/bill/{}/", id_of(bill)),
        title_or(bill, "title", "Untitled bill"),
    );
    if let Some(t) = bill_type_label(bill) {
        out.push_str(&format!(" <em>{}</em>", escape(&t)));
    }
    out.push_str(&status_badge(bill));
    out
}

fn meeting_entry(meeting: &Value) -> String {
    let mut out = link(
        &format!("/committee-meeting/{}/", id_of(meeting)),
        title_or(meeting, "title", "Untitled meeting"),
    );
    out.push_str(&date_span(meeting, "date"));
    if let Some(name) = str_field(meeting, "committee_name") {
        out.push_str(&format!(" <small>{}</small>", escape(name)));
    }
    out
}

fn file_entries(state: &WebState, docs: &[Value], label_key: &str) -> Vec<String> {
    docs.iter()
        .map(|doc| {
            let label = str_field(doc, label_key)
                .or_else(|| str_field(doc, "origname"))
                .unwrap_or("Download");
            match str_field(doc, "file_path") {
                Some(path) => link(&state.static_url(path), label),
                None => escape(label),
            }
        })
        .collect()
}

/// GET /
pub async fn index(State(state): State<Arc<WebState>>, req: RequestInfo) -> PageResult {
    tracing::debug!("index page called");
    let api = Api::new(&state, &req);

    let meetings = api.get("committee-meeting", None, None).await?;
    let bills = api.get("bill", None, None).await?;

    let meetings: Vec<String> = items(&meetings, "results")
        .iter()
        .filter(|m| m.get("committee_id").is_some_and(|c| !c.is_null()))
        .take(10)
        .map(meeting_entry)
        .collect();
    let bills: Vec<String> = items(&bills, "results").iter().take(10).map(bill_entry).collect();

    let body = format!(
        "<h1>Parliamentary Monitoring Group</h1>\n{}{}",
        section("Recent committee meetings", &meetings),
        section("Bills", &bills)
    );
    Ok(Html(layout("Home", &[], &body)))
}

/// GET /bills/
pub async fn bills() -> Html<String> {
    tracing::debug!("bills page called");
    let mut body = String::from("<h1>Bills</h1>\n");
    for (heading, href, blurb) in BILL_SECTIONS {
        body.push_str(&format!(
            "<h2>{}</h2>\n<p>{}</p>\n",
            link(href, heading),
            escape(blurb)
        ));
    }
    Html(layout("Bills", &[], &body))
}

/// GET /bills/current/
pub async fn current_bills(State(state): State<Arc<WebState>>, req: RequestInfo) -> PageResult {
    let api = Api::new(&state, &req);
    let bills = api.all("bill/current").await?;

    let mut body = String::from(
        "<h1>Current Bills</h1>\n<p>Weekly update for all current bills.</p>\n\
         <table class=\"table\">\n<tr><th>Bill</th><th>Type</th><th>Status</th><th>Introduced</th></tr>\n",
    );
    for bill in items(&bills, "results") {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            link(&format!("/bill/{}/", id_of(bill)), title_or(bill, "title", "Untitled bill")),
            escape(&bill_type_label(bill).unwrap_or_default()),
            status_badge(bill),
            str_field(bill, "date_of_introduction")
                .map(|d| escape(&pretty_date(d)))
                .unwrap_or_default(),
        ));
    }
    body.push_str("</table>\n");

    Ok(Html(layout("Current Bills", &[], &body)))
}

/// GET /bill/{id}/ - bills with a code live on the bill tracker
pub async fn bill(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    Path(bill_id): Path<i32>,
) -> Result<Response, WebError> {
    let api = Api::new(&state, &req);
    let bill = api.get("bill", Some(bill_id), None).await?;

    if let Some(code) = str_field(&bill, "bill_code") {
        tracing::debug!(bill_id, code, "Redirecting to bill tracker");
        let target = format!("{}/bill/{}", BILL_TRACKER, code);
        return Ok((StatusCode::FOUND, [(LOCATION, target)]).into_response());
    }

    let events: Vec<String> = items(&bill, "events")
        .iter()
        .map(|e| format!("{}{}", escape(title_or(e, "title", title_or(e, "type", ""))), date_span(e, "date")))
        .collect();

    let title = title_or(&bill, "title", "Bill").to_string();
    let mut body = format!("<h1>{}{}</h1>\n", escape(&title), status_badge(&bill));
    if let Some(t) = bill_type_label(&bill) {
        body.push_str(&format!("<p>{}</p>\n", escape(&t)));
    }
    if let Some(by) = str_field(&bill, "introduced_by") {
        body.push_str(&format!("<p>Introduced by {}</p>\n", escape(by)));
    }
    body.push_str(&section("Events", &events));

    Ok(Html(layout(&title, &[], &body)).into_response())
}

/// GET /committees/
pub async fn committees(State(state): State<Arc<WebState>>, req: RequestInfo) -> PageResult {
    tracing::debug!("committees page called");
    let api = Api::new(&state, &req);
    let list = api.all("committee").await?;

    // Grouped by house, in the order houses first appear
    let mut houses: Vec<(String, Vec<String>)> = Vec::new();
    for committee in items(&list, "results") {
        let house = str_field(committee, "house").unwrap_or("Other").to_string();
        let mut entry = link(
            &format!("/committee/{}/", id_of(committee)),
            title_or(committee, "name", "Committee"),
        );
        if committee.get("ad_hoc").and_then(Value::as_bool).unwrap_or(false) {
            entry.push_str(" <small>(ad hoc)</small>");
        }

        match houses.iter_mut().find(|(h, _)| *h == house) {
            Some((_, entries)) => entries.push(entry),
            None => houses.push((house, vec![entry])),
        }
    }

    let mut body = String::from("<h1>Committees</h1>\n");
    for (house, entries) in &houses {
        body.push_str(&section(house, entries));
    }
    Ok(Html(layout("Committees", &[], &body)))
}

/// GET /committee/{id}/
pub async fn committee_detail(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    Path(committee_id): Path<i32>,
) -> PageResult {
    tracing::debug!(committee_id, "committee detail page called");
    let api = Api::new(&state, &req);
    let committee = api.get("committee", Some(committee_id), None).await?;

    let meetings: Vec<String> = items(&committee, "meetings").iter().map(meeting_entry).collect();
    let calls: Vec<String> = items(&committee, "calls_for_comment")
        .iter()
        .map(|c| {
            let mut entry = escape(title_or(c, "title", ""));
            entry.push_str(&date_span(c, "start_date"));
            if let Some(end) = str_field(c, "end_date") {
                entry.push_str(&format!(" (closes {})", escape(&pretty_date(end))));
            }
            entry
        })
        .collect();
    let reports: Vec<String> = items(&committee, "tabled_reports")
        .iter()
        .map(|r| format!("{}{}", escape(title_or(r, "title", "")), date_span(r, "start_date")))
        .collect();
    let questions: Vec<String> = items(&committee, "questions")
        .iter()
        .map(|q| {
            format!(
                "<strong>{}</strong> {} asked {}{}<br>{}",
                text(q, "code"),
                text(q, "asked_by_name"),
                text(q, "minister"),
                date_span(q, "date"),
                text(q, "question"),
            )
        })
        .collect();
    let bills: Vec<String> = items(&committee, "bills").iter().map(bill_entry).collect();

    let name = title_or(&committee, "name", "Committee").to_string();
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<div class=\"about\">{}</div>\n{}{}{}{}{}",
        escape(&name),
        text(&committee, "house"),
        raw(&committee, "about"),
        section("Committee meetings", &meetings),
        section("Calls for comment", &calls),
        section("Tabled reports", &reports),
        section("Questions and replies", &questions),
        section("Bills", &bills),
    );
    Ok(Html(layout(&name, &[], &body)))
}

/// GET /committee-meetings/
pub async fn committee_meetings_first(state: State<Arc<WebState>>, req: RequestInfo) -> PageResult {
    render_committee_meetings(state, req, 0).await
}

/// GET /committee-meetings/{page}/
pub async fn committee_meetings(
    state: State<Arc<WebState>>,
    req: RequestInfo,
    Path(page): Path<u32>,
) -> PageResult {
    render_committee_meetings(state, req, page).await
}

async fn render_committee_meetings(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    page: u32,
) -> PageResult {
    let api = Api::new(&state, &req);
    let list = api.get("committee-meeting", None, Some(page)).await?;

    let count = list.get("count").and_then(Value::as_u64).unwrap_or_default();
    let pages = num_pages(count, state.results_per_page);
    let meetings: Vec<String> = items(&list, "results").iter().map(meeting_entry).collect();

    let body = format!(
        "<h1>Committee meetings</h1>\n{}<ul class=\"pagination\">{}</ul>\n",
        section("Meetings", &meetings),
        pagination(pages, page, "/committee-meetings", &req.query)
    );
    Ok(Html(layout("Committee meetings", &[], &body)))
}

/// GET /committee-meeting/{id}/ - report, audio and related documents
pub async fn committee_meeting(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    Path(event_id): Path<i32>,
) -> PageResult {
    let api = Api::new(&state, &req);
    let event = api.get("committee-meeting", Some(event_id), None).await?;

    let mut summary = String::new();
    let mut report = String::new();
    let mut audio = Vec::new();
    let mut related = Vec::new();
    for item in items(&event, "content") {
        let kind = str_field(item, "type").unwrap_or_default();
        if kind == MEETING_REPORT {
            report = raw(item, "body");
            summary = raw(item, "summary");
        } else if kind.contains("audio") {
            audio.push(item.clone());
        } else {
            related.push(item.clone());
        }
    }
    if report.is_empty() {
        report = raw(&event, "body");
    }

    let audio: Vec<String> = audio
        .iter()
        .map(|a| match str_field(a, "file_path") {
            Some(path) => format!(
                "{}<br><audio controls src=\"{}\"></audio>",
                escape(title_or(a, "title", "Audio")),
                escape(&state.static_url(path))
            ),
            None => escape(title_or(a, "title", "Audio")),
        })
        .collect();
    let mut docs = file_entries(&state, &related, "title");
    docs.extend(file_entries(&state, items(&event, "files"), "title"));

    let title = title_or(&event, "title", "Committee meeting").to_string();
    let mut body = format!("<h1>{}</h1>\n", escape(&title));
    if let (Some(id), Some(name)) = (
        event.get("committee_id").and_then(Value::as_i64),
        str_field(&event, "committee_name"),
    ) {
        body.push_str(&format!("<p>{}</p>\n", link(&format!("/committee/{}/", id), name)));
    }
    body.push_str(&format!("<p>{}</p>\n", date_span(&event, "date")));
    if !summary.is_empty() {
        body.push_str(&format!("<div class=\"summary\">{}</div>\n", summary));
    }
    body.push_str(&format!("<div class=\"report\">{}</div>\n", report));
    body.push_str(&section("Audio", &audio));
    body.push_str(&section("Related documents", &docs));

    Ok(Html(layout(&title, &[], &body)))
}

/// GET /members/
pub async fn members_first(state: State<Arc<WebState>>, req: RequestInfo) -> PageResult {
    render_members(state, req, 0).await
}

/// GET /members/{page}/
pub async fn members(
    state: State<Arc<WebState>>,
    req: RequestInfo,
    Path(page): Path<u32>,
) -> PageResult {
    render_members(state, req, page).await
}

async fn render_members(State(state): State<Arc<WebState>>, req: RequestInfo, page: u32) -> PageResult {
    tracing::debug!(page, "members page called");
    let api = Api::new(&state, &req);
    let list = api.get("member", None, Some(page)).await?;

    let count = list.get("count").and_then(Value::as_u64).unwrap_or_default();
    let pages = num_pages(count, state.results_per_page);
    let members: Vec<String> = items(&list, "results")
        .iter()
        .map(|m| {
            let mut entry = link(&format!("/member/{}", id_of(m)), title_or(m, "name", "Member"));
            for key in ["party", "province"] {
                if let Some(v) = str_field(m, key) {
                    entry.push_str(&format!(" <small>{}</small>", escape(v)));
                }
            }
            entry
        })
        .collect();

    let body = format!(
        "<h1>Members</h1>\n{}<ul class=\"pagination\">{}</ul>\n",
        section("Members of Parliament", &members),
        pagination(pages, page, "/members", &req.query)
    );
    Ok(Html(layout("Members", &[], &body)))
}

/// GET /member/{id}
pub async fn member(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    Path(member_id): Path<i32>,
) -> PageResult {
    tracing::debug!(member_id, "member page called");
    let api = Api::new(&state, &req);
    let member = api.get("member", Some(member_id), None).await?;

    let name = title_or(&member, "name", "Member").to_string();
    let mut body = format!("<h1>{}</h1>\n", escape(&name));
    if let Some(pic) = str_field(&member, "profile_pic_url") {
        body.push_str(&format!(
            "<img class=\"profile-pic\" src=\"{}\" alt=\"{}\">\n",
            escape(&state.static_url(pic)),
            escape(&name)
        ));
    }
    body.push_str("<dl>\n");
    for (label, key) in [("Party", "party"), ("House", "house"), ("Province", "province")] {
        if str_field(&member, key).is_some() {
            body.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", label, text(&member, key)));
        }
    }
    body.push_str("</dl>\n");
    body.push_str(&format!("<div class=\"bio\">{}</div>\n", raw(&member, "bio")));

    let questions: Vec<String> = items(&member, "questions")
        .iter()
        .map(|q| format!("<strong>{}</strong>{} {}", text(q, "code"), date_span(q, "date"), text(q, "question")))
        .collect();
    body.push_str(&section("Questions asked", &questions));

    Ok(Html(layout(&name, &[], &body)))
}

fn render_proceeding(state: &WebState, doc: &Value, fallback: &str) -> Html<String> {
    let title = title_or(doc, "title", fallback).to_string();
    let mut body = format!("<h1>{}</h1>\n<p>{}{}</p>\n", escape(&title), text(doc, "house"), date_span(doc, "date"));
    if str_field(doc, "summary").is_some() {
        body.push_str(&format!("<div class=\"summary\">{}</div>\n", raw(doc, "summary")));
    }
    body.push_str(&format!("<div class=\"body\">{}</div>\n", raw(doc, "body")));

    let mut docs = file_entries(state, items(doc, "content"), "title");
    docs.extend(file_entries(state, items(doc, "files"), "title"));
    body.push_str(&section("Documents", &docs));

    Html(layout(&title, &[], &body))
}

/// GET /hansard/{id}
pub async fn hansard(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    Path(hansard_id): Path<i32>,
) -> PageResult {
    tracing::debug!(hansard_id, "hansard page called");
    let api = Api::new(&state, &req);
    let hansard = api.get("hansard", Some(hansard_id), None).await?;
    Ok(render_proceeding(&state, &hansard, "Hansard"))
}

/// GET /briefing/{id}
pub async fn briefing(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    Path(briefing_id): Path<i32>,
) -> PageResult {
    tracing::debug!(briefing_id, "briefing page called");
    let api = Api::new(&state, &req);
    let briefing = api.get("briefing", Some(briefing_id), None).await?;
    Ok(render_proceeding(&state, &briefing, "Media briefing"))
}

/// GET /question_reply/{id}
pub async fn question_reply(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    Path(reply_id): Path<i32>,
) -> PageResult {
    tracing::debug!(reply_id, "question_reply page called");
    let api = Api::new(&state, &req);
    let reply = api.get("question_reply", Some(reply_id), None).await?;

    let title = title_or(&reply, "title", "Question reply").to_string();
    let mut body = format!("<h1>{}</h1>\n<dl>\n", escape(&title));
    for (label, key) in [
        ("Question", "question_number"),
        ("Minister", "minister"),
        ("Committee", "committee_name"),
    ] {
        if str_field(&reply, key).is_some() {
            body.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", label, text(&reply, key)));
        }
    }
    body.push_str("</dl>\n");
    body.push_str(&format!("<p>{}</p>\n", date_span(&reply, "start_date")));
    body.push_str(&format!("<div class=\"body\">{}</div>\n", raw(&reply, "body")));

    Ok(Html(layout(&title, &[], &body)))
}

/// Page link for a search hit
pub fn search_hit_url(content_type: &str, id: i64) -> String {
    match content_type {
        "committee-meeting" => format!("/committee-meeting/{}/", id),
        "bill" => format!("/bill/{}/", id),
        "member" => format!("/member/{}", id),
        "hansard" => format!("/hansard/{}", id),
        "briefing" => format!("/briefing/{}", id),
        "question_reply" => format!("/question_reply/{}", id),
        other => format!("/{}/{}", other, id),
    }
}

fn search_form(q: &str, content_type: &str) -> String {
    let mut options = String::from("<option value=\"\">Everything</option>");
    for (value, label) in [
        ("committee-meeting", "Committee meetings"),
        ("bill", "Bills"),
        ("member", "Members"),
        ("hansard", "Hansards"),
        ("briefing", "Media briefings"),
        ("question_reply", "Question replies"),
    ] {
        let selected = if value == content_type { " selected" } else { "" };
        options.push_str(&format!("<option value=\"{}\"{}>{}</option>", value, selected, label));
    }
    format!(
        "<form action=\"/search/\" method=\"get\">\n\
         <input type=\"text\" name=\"q\" value=\"{}\">\n\
         <select name=\"filter[type]\">{}</select>\n\
         <button type=\"submit\">Search</button>\n</form>\n",
        escape(q),
        options
    )
}

/// GET /search/
pub async fn search_first(
    state: State<Arc<WebState>>,
    req: RequestInfo,
    params: Query<HashMap<String, String>>,
) -> PageResult {
    render_search(state, req, params, 0).await
}

/// GET /search/{page}/
pub async fn search(
    state: State<Arc<WebState>>,
    req: RequestInfo,
    params: Query<HashMap<String, String>>,
    Path(page): Path<u32>,
) -> PageResult {
    render_search(state, req, params, page).await
}

async fn render_search(
    State(state): State<Arc<WebState>>,
    req: RequestInfo,
    Query(params): Query<HashMap<String, String>>,
    page: u32,
) -> PageResult {
    let q = params.get("q").map(|s| s.trim().to_string()).unwrap_or_default();
    let content_type = params.get("filter[type]").cloned().unwrap_or_default();
    let per_page = params
        .get("per_page")
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(state.results_per_page);

    let mut body = format!("<h1>Search</h1>\n{}", search_form(&q, &content_type));
    if q.is_empty() {
        return Ok(Html(layout("Search", &[], &body)));
    }

    tracing::debug!(q = %q, page, "search page called");
    let mut query = vec![
        ("q", q.clone()),
        ("page", page.to_string()),
        ("per_page", per_page.to_string()),
    ];
    if !content_type.is_empty() {
        query.push(("type", content_type.clone()));
    }

    let api = Api::new(&state, &req);
    let result = api.search(&query).await?;
    let hits = result.get("hits").cloned().unwrap_or(Value::Null);
    let count = hits.get("total").and_then(Value::as_u64).unwrap_or_default();

    let entries: Vec<String> = items(&hits, "hits")
        .iter()
        .map(|hit| {
            let kind = str_field(hit, "content_type").unwrap_or_default();
            format!(
                "{} <small>{}</small>{}<br>{}",
                link(&search_hit_url(kind, id_of(hit)), title_or(hit, "title", "Untitled")),
                escape(kind),
                date_span(hit, "date"),
                raw(hit, "highlight"),
            )
        })
        .collect();

    body.push_str(&format!("<p>{} results for <strong>{}</strong></p>\n", count, escape(&q)));
    body.push_str(&section("Results", &entries));
    body.push_str(&format!(
        "<ul class=\"pagination\">{}</ul>\n",
        pagination(num_pages(count, per_page), page, "/search", &req.query)
    ));

    Ok(Html(layout("Search", &[], &body)))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub api_key: String,
    pub next: Option<String>,
}

/// Only same-site paths are followed after login.
///
/// Browsers treat `/\host` like `//host` and drop tabs and newlines from
/// URLs, so both are refused along with protocol-relative paths.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n)
            if n.starts_with('/')
                && !matches!(n.as_bytes().get(1), Some(b'/') | Some(b'\\'))
                && !n.chars().any(char::is_control) =>
        {
            n
        }
        _ => "/",
    }
}

fn login_page(next: &str, flashes: &[String]) -> Html<String> {
    let body = format!(
        "<h1>Log in</h1>\n<form action=\"/login\" method=\"post\">\n\
         <input type=\"hidden\" name=\"next\" value=\"{}\">\n\
         <label>API key <input type=\"password\" name=\"api_key\"></label>\n\
         <button type=\"submit\">Log in</button>\n</form>\n",
        escape(next)
    );
    Html(layout("Log in", flashes, &body))
}

/// GET /login
pub async fn login_form(Query(params): Query<LoginParams>) -> Html<String> {
    login_page(safe_next(params.next.as_deref()), &[])
}

/// POST /login - store the API key in a cookie
pub async fn login(Form(form): Form<LoginForm>) -> Response {
    let next = safe_next(form.next.as_deref()).to_string();
    let key: String = form
        .api_key
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if key.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            login_page(&next, &["An API key is required.".to_string()]),
        )
            .into_response();
    }

    (
        StatusCode::FOUND,
        [
            (LOCATION, next),
            (
                SET_COOKIE,
                format!("{}={}; Path=/; HttpOnly; SameSite=Lax", API_KEY_COOKIE, key),
            ),
        ],
    )
        .into_response()
}
