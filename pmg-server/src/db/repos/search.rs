//! Full-text search across meetings, bills, members, hansards, briefings
//! and question replies, using PostgreSQL text search.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use super::DbError;
use crate::models::{ContentType, SearchHit, SearchHits, SearchTerm};

const SEARCH_SQL: &str = r#"
    WITH docs AS (
        SELECT 'committee-meeting'::text AS content_type, e.id, e.title::text AS title,
               COALESCE(e.summary, '') || ' ' || COALESCE(e.body, '') AS text,
               e.date::date AS date, e.date AS stamp, e.committee_id
        FROM event e WHERE e.type = 'committee-meeting'
        UNION ALL
        SELECT 'hansard', e.id, e.title::text, COALESCE(e.summary, '') || ' ' || COALESCE(e.body, ''),
               e.date::date, e.date, e.committee_id
        FROM event e WHERE e.type = 'plenary'
        UNION ALL
        SELECT 'briefing', e.id, e.title::text, COALESCE(e.summary, '') || ' ' || COALESCE(e.body, ''),
               e.date::date, e.date, e.committee_id
        FROM event e WHERE e.type = 'media-briefing'
        UNION ALL
        SELECT 'bill', b.id, b.title::text, COALESCE(b.introduced_by, ''),
               b.date_of_introduction, NULL::timestamptz, NULL::integer
        FROM bill b
        UNION ALL
        SELECT 'member', m.id, m.name::text, COALESCE(m.bio, ''), NULL::date, NULL::timestamptz, NULL::integer
        FROM member m
        UNION ALL
        SELECT 'question_reply', r.id, r.title::text, COALESCE(r.body, ''),
               r.start_date, NULL::timestamptz, r.committee_id
        FROM question_reply r
    ),
    ranked AS (
        SELECT d.*,
               ts_rank(to_tsvector('english', COALESCE(d.title, '') || ' ' || d.text),
                       plainto_tsquery('english', $1))::float8 AS score
        FROM docs d
        WHERE to_tsvector('english', COALESCE(d.title, '') || ' ' || d.text)
              @@ plainto_tsquery('english', $1)
          AND ($2::text IS NULL OR d.content_type = $2)
          AND ($3::timestamptz IS NULL OR
               CASE WHEN d.stamp IS NOT NULL THEN d.stamp > $3
                    ELSE d.date > ($3 AT TIME ZONE 'UTC')::date END)
          AND ($7::timestamptz IS NULL OR
               CASE WHEN d.stamp IS NOT NULL THEN d.stamp <= $7
                    ELSE d.date <= ($7 AT TIME ZONE 'UTC')::date END)
          AND ($4::integer IS NULL OR d.committee_id = $4)
    )
    SELECT content_type, id, title, date, score,
           ts_headline('english', text, plainto_tsquery('english', $1)) AS highlight,
           COUNT(*) OVER() AS total,
           MAX(score) OVER() AS max_score
    FROM ranked
    ORDER BY score DESC, date DESC NULLS LAST, id
    LIMIT $5 OFFSET $6
"#;

/// Search parameters
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub term: SearchTerm,
    pub content_type: Option<ContentType>,
    /// Only content dated strictly after this instant. Date-only content
    /// must fall on a later UTC day.
    pub newer_than: Option<DateTime<Utc>>,
    /// Only content dated at or before this instant (same day rule for
    /// date-only content)
    pub not_after: Option<DateTime<Utc>>,
    pub committee_id: Option<i32>,
    pub limit: i64,
    pub offset: i64,
}

impl SearchQuery {
    pub fn new(term: SearchTerm) -> Self {
        Self {
            term,
            content_type: None,
            newer_than: None,
            not_after: None,
            committee_id: None,
            limit: 10,
            offset: 0,
        }
    }
}

pub struct SearchRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SearchRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchHits, DbError> {
        let rows = sqlx::query(SEARCH_SQL)
            .bind(query.term.as_str())
            .bind(query.content_type.map(|t| t.as_str()))
            .bind(query.newer_than)
            .bind(query.committee_id)
            .bind(query.limit)
            .bind(query.offset)
            .bind(query.not_after)
            .fetch_all(self.pool)
            .await?;

        let (total, max_score) = match rows.first() {
            Some(row) => (
                row.try_get::<i64, _>("total")?,
                row.try_get::<Option<f64>, _>("max_score")?,
            ),
            None => (0, None),
        };

        let hits = rows
            .iter()
            .map(|row| {
                Ok(SearchHit {
                    id: row.try_get("id")?,
                    content_type: row.try_get("content_type")?,
                    title: row.try_get("title")?,
                    date: row.try_get("date")?,
                    highlight: row.try_get("highlight")?,
                    score: row.try_get("score")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!(q = query.term.as_str(), total, "Search complete");

        Ok(SearchHits {
            total,
            max_score,
            hits,
        })
    }
}
