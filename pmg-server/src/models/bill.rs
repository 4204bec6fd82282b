use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::serializer::{api_date, api_datetime};

/// Status names that count as "current"
pub const CURRENT_STATUSES: [&str; 3] = ["na", "ncop", "assent"];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bill {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub number: Option<i32>,
    pub bill_code: Option<String>,
    pub introduced_by: Option<String>,
    #[serde(serialize_with = "api_date::option::serialize")]
    pub date_of_introduction: Option<NaiveDate>,
    #[serde(serialize_with = "api_date::option::serialize")]
    pub date_of_assent: Option<NaiveDate>,
    /// Short status name, e.g. `na`, `enacted`
    pub status: Option<String>,
    pub status_description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub bill_type: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BillEvent {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub event_type: String,
    pub title: Option<String>,
    #[serde(serialize_with = "api_datetime::serialize")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillDetail {
    #[serde(flatten)]
    pub bill: Bill,
    pub events: Vec<BillEvent>,
}
