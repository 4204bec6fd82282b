//! User and saved-search repositories

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::DbError;
use crate::models::{SavedSearch, User};

pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active user owning `api_key`, with role names.
    pub async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as(
            r#"
            SELECT u.id, u.email,
                   COALESCE(array_agg(r.name::text) FILTER (WHERE r.name IS NOT NULL), '{}'::text[]) AS roles
            FROM "user" u
            LEFT JOIN roles_users ru ON ru.user_id = u.id
            LEFT JOIN role r ON r.id = ru.role_id
            WHERE u.api_key = $1 AND u.active
            GROUP BY u.id, u.email
            "#,
        )
        .bind(api_key)
        .fetch_optional(self.pool)
        .await?)
    }
}

pub struct SavedSearchRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SavedSearchRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<SavedSearch>, DbError> {
        Ok(sqlx::query_as(
            r#"
            SELECT id, user_id, search, content_type, committee_id, last_alerted_at
            FROM saved_search
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?)
    }

    pub async fn mark_alerted(&self, id: i32, at: DateTime<Utc>) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE saved_search SET last_alerted_at = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("saved_search", id));
        }
        Ok(())
    }
}
