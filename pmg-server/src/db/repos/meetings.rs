//! Committee meeting repository

use sqlx::PgPool;

use super::{paginate, proceedings, DbError};
use crate::models::event::COMMITTEE_MEETING;
use crate::models::{Meeting, MeetingDetail, Paginated, Pagination};

const MEETING_SELECT: &str = r#"
    SELECT e.id, e.title, e.date, e.summary, e.actual_start_time, e.actual_end_time,
           e.committee_id, c.name AS committee_name
    FROM event e
    LEFT JOIN committee c ON c.id = e.committee_id
    WHERE e.type = 'committee-meeting'
"#;

pub struct CommitteeMeetingRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommitteeMeetingRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recent meetings first.
    pub async fn list(&self, page: Pagination) -> Result<Paginated<Meeting>, DbError> {
        let sql = format!(
            r#"
            SELECT q.*, COUNT(*) OVER() AS total FROM ({MEETING_SELECT}) q
            ORDER BY q.date DESC, q.id DESC
            LIMIT $1 OFFSET $2
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;
        paginate(rows, page)
    }

    pub async fn list_for_committee(&self, committee_id: i32) -> Result<Vec<Meeting>, DbError> {
        let sql = format!("{MEETING_SELECT} AND e.committee_id = $1 ORDER BY e.date DESC");
        Ok(sqlx::query_as(&sql)
            .bind(committee_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Meeting with its report, audio and related documents.
    pub async fn get_with_content(&self, id: i32) -> Result<MeetingDetail, DbError> {
        let sql = format!("{MEETING_SELECT} AND e.id = $1");
        let meeting: Meeting = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(COMMITTEE_MEETING, id))?;

        let body: Option<String> = sqlx::query_scalar("SELECT body FROM event WHERE id = $1")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        let content = proceedings::content_for_event(self.pool, id).await?;
        let files = proceedings::files_for_event(self.pool, id).await?;

        Ok(MeetingDetail {
            meeting,
            body,
            content,
            files,
        })
    }
}
