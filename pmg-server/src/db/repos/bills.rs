//! Bill repository

use sqlx::PgPool;

use super::{paginate, DbError};
use crate::models::bill::CURRENT_STATUSES;
use crate::models::{Bill, BillDetail, BillEvent, Paginated, Pagination};

const BILL_SELECT: &str = r#"
    SELECT b.id, b.title, b.year, b.number, b.code AS bill_code, b.introduced_by,
           b.date_of_introduction, b.date_of_assent,
           bs.name AS status, bs.description AS status_description,
           bt.name AS type
    FROM bill b
    JOIN bill_type bt ON bt.id = b.type_id
    LEFT JOIN bill_status bs ON bs.id = b.status_id
"#;

const BILL_ORDER: &str = "ORDER BY b.year DESC, b.number ASC NULLS LAST, b.id";

pub struct BillRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BillRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, page: Pagination) -> Result<Paginated<Bill>, DbError> {
        let sql = format!(
            r#"
            SELECT q.*, COUNT(*) OVER() AS total FROM ({BILL_SELECT}) q
            ORDER BY q.year DESC, q.number ASC NULLS LAST, q.id
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

    /// Bills whose status is still in progress or awaiting assent.
    pub async fn list_current(&self) -> Result<Vec<Bill>, DbError> {
        let sql = format!("{BILL_SELECT} WHERE bs.name = ANY($1) {BILL_ORDER}");
        let statuses: Vec<&str> = CURRENT_STATUSES.to_vec();
        Ok(sqlx::query_as(&sql)
            .bind(statuses)
            .fetch_all(self.pool)
            .await?)
    }

    /// Bills linked to any event of the committee.
    pub async fn list_for_committee(&self, committee_id: i32) -> Result<Vec<Bill>, DbError> {
        let sql = format!(
            r#"
            {BILL_SELECT}
            WHERE b.id IN (
                SELECT eb.bill_id FROM event_bills eb
                JOIN event e ON e.id = eb.event_id
                WHERE e.committee_id = $1
            )
            {BILL_ORDER}
            "#
        );
        Ok(sqlx::query_as(&sql)
            .bind(committee_id)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<BillDetail, DbError> {
        let sql = format!("{BILL_SELECT} WHERE b.id = $1");
        let bill: Bill = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("bill", id))?;

        let events: Vec<BillEvent> = sqlx::query_as(
            r#"
            SELECT e.id, e.type, e.title, e.date
            FROM event e
            JOIN event_bills eb ON eb.event_id = e.id
            WHERE eb.bill_id = $1
            ORDER BY e.date
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(BillDetail { bill, events })
    }
}
