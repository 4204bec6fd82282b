use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Role required for the admin reports
pub const EDITOR_ROLE: &str = "editor";

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub roles: Vec<String>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SavedSearch {
    pub id: i32,
    pub user_id: i32,
    pub search: String,
    pub content_type: Option<String>,
    pub committee_id: Option<i32>,
    pub last_alerted_at: DateTime<Utc>,
}
