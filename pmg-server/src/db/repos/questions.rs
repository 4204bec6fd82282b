//! Question reply repository

use sqlx::PgPool;

use super::{paginate, DbError};
use crate::models::{Paginated, Pagination, QuestionReply};

const REPLY_SELECT: &str = r#"
    SELECT r.id, r.title, r.body, r.question_number, r.start_date,
           m.name AS minister, r.committee_id, c.name AS committee_name
    FROM question_reply r
    LEFT JOIN minister m ON m.id = r.minister_id
    LEFT JOIN committee c ON c.id = r.committee_id
"#;

pub struct QuestionReplyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestionReplyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, page: Pagination) -> Result<Paginated<QuestionReply>, DbError> {
        let sql = format!(
            r#"
            SELECT q.*, COUNT(*) OVER() AS total FROM ({REPLY_SELECT}) q
            ORDER BY q.start_date DESC NULLS LAST, q.id DESC
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

    pub async fn get(&self, id: i32) -> Result<QuestionReply, DbError> {
        let sql = format!("{REPLY_SELECT} WHERE r.id = $1");
        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("question_reply", id))
    }
}
