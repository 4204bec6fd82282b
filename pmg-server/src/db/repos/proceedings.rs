//! Hansard and briefing repository, plus the event attachments shared
//! with committee meetings.

use sqlx::PgPool;

use super::DbError;
use crate::models::event::{MEDIA_BRIEFING, PLENARY};
use crate::models::{ContentItem, EventFile, Proceeding, ProceedingDetail};

pub struct ProceedingRepo<'a> {
    pool: &'a PgPool,
    event_type: &'static str,
    resource: &'static str,
}

impl<'a> ProceedingRepo<'a> {
    /// Repository over events of `event_type`, reported as `resource` in
    /// not-found errors.
    pub fn new(pool: &'a PgPool, event_type: &'static str, resource: &'static str) -> Self {
        Self {
            pool,
            event_type,
            resource,
        }
    }

    pub fn hansards(pool: &'a PgPool) -> Self {
        Self::new(pool, PLENARY, "hansard")
    }

    pub fn briefings(pool: &'a PgPool) -> Self {
        Self::new(pool, MEDIA_BRIEFING, "briefing")
    }

    pub async fn get(&self, id: i32) -> Result<ProceedingDetail, DbError> {
        let proceeding: Proceeding = sqlx::query_as(
            r#"
            SELECT e.id, e.type, e.title, e.date, e.summary, e.body,
                   h.name AS house, e.committee_id
            FROM event e
            LEFT JOIN house h ON h.id = e.house_id
            WHERE e.id = $1 AND e.type = $2
            "#,
        )
        .bind(id)
        .bind(self.event_type)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(self.resource, id))?;

        let content = content_for_event(self.pool, id).await?;
        let files = files_for_event(self.pool, id).await?;

        Ok(ProceedingDetail {
            proceeding,
            content,
            files,
        })
    }
}

pub(crate) async fn content_for_event(
    pool: &PgPool,
    event_id: i32,
) -> Result<Vec<ContentItem>, DbError> {
    Ok(sqlx::query_as(
        r#"
        SELECT ct.id, ct.type, ct.title, ct.summary, ct.body, f.file_path, f.file_mime
        FROM content ct
        LEFT JOIN file f ON f.id = ct.file_id
        WHERE ct.event_id = $1
        ORDER BY ct.id
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?)
}

pub(crate) async fn files_for_event(
    pool: &PgPool,
    event_id: i32,
) -> Result<Vec<EventFile>, DbError> {
    Ok(sqlx::query_as(
        r#"
        SELECT f.id, f.title, f.file_mime, f.origname, f.file_path, f.file_bytes
        FROM file f
        JOIN event_files ef ON ef.file_id = f.id
        WHERE ef.event_id = $1
        ORDER BY f.id
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?)
}
