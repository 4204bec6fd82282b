//! Member repository

use sqlx::PgPool;

use super::{paginate, DbError};
use crate::models::{CommitteeQuestion, Member, MemberDetail, Paginated, Pagination};

const MEMBER_SELECT: &str = r#"
    SELECT m.id, m.name, m.profile_pic_url, m.current,
           p.name AS party, h.name AS house, pr.name AS province
    FROM member m
    LEFT JOIN party p ON p.id = m.party_id
    LEFT JOIN house h ON h.id = m.house_id
    LEFT JOIN province pr ON pr.id = m.province_id
"#;

pub struct MemberRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Current members first, then alphabetical.
    pub async fn list(&self, page: Pagination) -> Result<Paginated<Member>, DbError> {
        let sql = format!(
            r#"
            SELECT q.*, COUNT(*) OVER() AS total FROM ({MEMBER_SELECT}) q
            ORDER BY q.current DESC, q.name
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

    pub async fn get(&self, id: i32) -> Result<MemberDetail, DbError> {
        let sql = format!("{MEMBER_SELECT} WHERE m.id = $1");
        let member: Member = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("member", id))?;

        let bio: Option<String> = sqlx::query_scalar("SELECT bio FROM member WHERE id = $1")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        let questions: Vec<CommitteeQuestion> = sqlx::query_as(
            r#"
            SELECT q.id, q.code, q.date, q.question, q.answer,
                   COALESCE(q.asked_by_name, $2) AS asked_by_name,
                   mi.name AS minister, q.committee_id
            FROM committee_question q
            LEFT JOIN minister mi ON mi.id = q.minister_id
            WHERE q.asked_by_member_id = $1
            ORDER BY q.date DESC
            "#,
        )
        .bind(id)
        .bind(&member.name)
        .fetch_all(self.pool)
        .await?;

        Ok(MemberDetail {
            member,
            bio,
            questions,
        })
    }
}
