//! Events: committee meetings, hansards (plenaries) and media briefings

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::serializer::api_datetime;

/// Event type stored for committee meetings
pub const COMMITTEE_MEETING: &str = "committee-meeting";
/// Event type stored for hansards
pub const PLENARY: &str = "plenary";
/// Event type stored for media briefings
pub const MEDIA_BRIEFING: &str = "media-briefing";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Meeting {
    pub id: i32,
    pub title: Option<String>,
    #[serde(serialize_with = "api_datetime::serialize")]
    pub date: DateTime<Utc>,
    pub summary: Option<String>,
    pub actual_start_time: Option<NaiveTime>,
    pub actual_end_time: Option<NaiveTime>,
    pub committee_id: Option<i32>,
    pub committee_name: Option<String>,
}

/// Report, audio or document attached to an event
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContentItem {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub content_type: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub file_path: Option<String>,
    pub file_mime: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventFile {
    pub id: i32,
    pub title: Option<String>,
    pub file_mime: Option<String>,
    pub origname: Option<String>,
    pub file_path: String,
    pub file_bytes: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingDetail {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub body: Option<String>,
    pub content: Vec<ContentItem>,
    pub files: Vec<EventFile>,
}

/// A hansard or briefing
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Proceeding {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub event_type: String,
    pub title: Option<String>,
    #[serde(serialize_with = "api_datetime::serialize")]
    pub date: DateTime<Utc>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub house: Option<String>,
    pub committee_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProceedingDetail {
    #[serde(flatten)]
    pub proceeding: Proceeding,
    pub content: Vec<ContentItem>,
    pub files: Vec<EventFile>,
}
