use serde::Serialize;
use sqlx::FromRow;

use super::CommitteeQuestion;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub profile_pic_url: Option<String>,
    pub current: bool,
    pub party: Option<String>,
    pub house: Option<String>,
    pub province: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberDetail {
    #[serde(flatten)]
    pub member: Member,
    pub bio: Option<String>,
    pub questions: Vec<CommitteeQuestion>,
}
