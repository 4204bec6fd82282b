//! Repository implementations for database access
//!
//! Each repository borrows the pool and exposes the reads one API
//! resource needs. Lists fetch a page and the total in a single query.

pub mod bills;
pub mod committees;
pub mod meetings;
pub mod members;
pub mod proceedings;
pub mod questions;
pub mod search;
pub mod users;

pub use bills::BillRepo;
pub use committees::CommitteeRepo;
pub use meetings::CommitteeMeetingRepo;
pub use members::MemberRepo;
pub use proceedings::ProceedingRepo;
pub use questions::QuestionReplyRepo;
pub use search::{SearchQuery, SearchRepo};
pub use users::{SavedSearchRepo, UserRepo};

use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::models::{Paginated, Pagination};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("migration {version}: {reason}")]
    Migration { version: i64, reason: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Decode rows that carry a `COUNT(*) OVER() AS total` column.
pub(crate) fn paginate<T>(rows: Vec<PgRow>, page: Pagination) -> Result<Paginated<T>, DbError>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    let total = match rows.first() {
        Some(row) => row.try_get::<i64, _>("total")?,
        None => 0,
    };
    let items = rows
        .iter()
        .map(T::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated { items, total, page })
}
