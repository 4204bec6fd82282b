use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use super::{Bill, CommitteeQuestion, Meeting};
use crate::serializer::api_date;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Committee {
    pub id: i32,
    pub name: String,
    pub about: Option<String>,
    pub contact_details: Option<String>,
    pub ad_hoc: bool,
    pub house_id: i32,
    pub house: String,
    pub house_short: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CallForComment {
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    #[serde(serialize_with = "api_date::serialize")]
    pub start_date: NaiveDate,
    #[serde(serialize_with = "api_date::option::serialize")]
    pub end_date: Option<NaiveDate>,
    pub committee_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TabledReport {
    pub id: i32,
    pub title: String,
    #[serde(serialize_with = "api_date::option::serialize")]
    pub start_date: Option<NaiveDate>,
    pub committee_id: Option<i32>,
}

/// Committee with everything its page shows
#[derive(Debug, Clone, Serialize)]
pub struct CommitteeDetail {
    #[serde(flatten)]
    pub committee: Committee,
    pub meetings: Vec<Meeting>,
    pub calls_for_comment: Vec<CallForComment>,
    pub tabled_reports: Vec<TabledReport>,
    pub questions: Vec<CommitteeQuestion>,
    pub bills: Vec<Bill>,
}
