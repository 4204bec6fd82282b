//! Committee repository

use sqlx::PgPool;

use super::{paginate, BillRepo, CommitteeMeetingRepo, DbError};
use crate::models::{
    CallForComment, Committee, CommitteeDetail, CommitteeQuestion, Paginated, Pagination,
    TabledReport,
};

const COMMITTEE_SELECT: &str = r#"
    SELECT c.id, c.name, c.about, c.contact_details, c.ad_hoc, c.house_id,
           h.name AS house, h.name_short AS house_short
    FROM committee c
    JOIN house h ON h.id = c.house_id
"#;

pub struct CommitteeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommitteeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every committee, by house then name.
    pub async fn list_all(&self) -> Result<Vec<Committee>, DbError> {
        let sql = format!("{COMMITTEE_SELECT} ORDER BY h.name_short, c.name");
        Ok(sqlx::query_as(&sql).fetch_all(self.pool).await?)
    }

    pub async fn list(&self, page: Pagination) -> Result<Paginated<Committee>, DbError> {
        let sql = format!(
            r#"
            SELECT q.*, COUNT(*) OVER() AS total FROM ({COMMITTEE_SELECT}) q
            ORDER BY q.house_short, q.name
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

    pub async fn get(&self, id: i32) -> Result<Committee, DbError> {
        let sql = format!("{COMMITTEE_SELECT} WHERE c.id = $1");
        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("committee", id))
    }

    /// Committee with meetings, calls for comment, tabled reports,
    /// questions and the bills it has dealt with.
    pub async fn get_with_related(&self, id: i32) -> Result<CommitteeDetail, DbError> {
        let committee = self.get(id).await?;

        let meetings = CommitteeMeetingRepo::new(self.pool)
            .list_for_committee(id)
            .await?;

        let calls_for_comment: Vec<CallForComment> = sqlx::query_as(
            r#"
            SELECT id, title, summary, start_date, end_date, committee_id
            FROM call_for_comment
            WHERE committee_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let tabled_reports: Vec<TabledReport> = sqlx::query_as(
            r#"
            SELECT id, title, start_date, committee_id
            FROM tabled_committee_report
            WHERE committee_id = $1
            ORDER BY start_date DESC NULLS LAST
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let questions: Vec<CommitteeQuestion> = sqlx::query_as(
            r#"
            SELECT q.id, q.code, q.date, q.question, q.answer, q.asked_by_name,
                   m.name AS minister, q.committee_id
            FROM committee_question q
            LEFT JOIN minister m ON m.id = q.minister_id
            WHERE q.committee_id = $1
            ORDER BY q.date DESC
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let bills = BillRepo::new(self.pool).list_for_committee(id).await?;

        tracing::debug!(
            committee_id = id,
            meetings = meetings.len(),
            bills = bills.len(),
            "Loaded committee detail"
        );

        Ok(CommitteeDetail {
            committee,
            meetings,
            calls_for_comment,
            tabled_reports,
            questions,
            bills,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // cargo test -p pmg-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_committee_is_not_found() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        crate::db::migrations::run(&pool).await.unwrap();

        let err = CommitteeRepo::new(&pool).get(-1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "committee", .. }));
    }
}
