use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::serializer::api_date;

/// Written or oral question put to a minister
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommitteeQuestion {
    pub id: i32,
    pub code: String,
    #[serde(serialize_with = "api_date::serialize")]
    pub date: NaiveDate,
    pub question: String,
    pub answer: Option<String>,
    pub asked_by_name: Option<String>,
    pub minister: Option<String>,
    pub committee_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuestionReply {
    pub id: i32,
    pub title: String,
    pub body: Option<String>,
    pub question_number: Option<String>,
    #[serde(serialize_with = "api_date::option::serialize")]
    pub start_date: Option<NaiveDate>,
    pub minister: Option<String>,
    pub committee_id: Option<i32>,
    pub committee_name: Option<String>,
}
