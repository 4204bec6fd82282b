//! Full-text search endpoint

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{SearchQuery, SearchRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{ContentType, Pagination, PaginationParams, SearchHits, SearchTerm};

/// Hits per page unless the client asks otherwise
const SEARCH_PER_PAGE: u32 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub committee: Option<i32>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SearchParams {
    /// Validate into a repository query.
    pub fn to_query(&self) -> Result<SearchQuery, ApiError> {
        let term = SearchTerm::new(&self.q)?;
        let content_type = self
            .content_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::parse::<ContentType>)
            .transpose()?;
        let page = Pagination::from_params(
            PaginationParams {
                page: self.page,
                per_page: self.per_page,
            },
            SEARCH_PER_PAGE,
        );

        let mut query = SearchQuery::new(term);
        query.content_type = content_type;
        query.committee_id = self.committee;
        query.limit = page.limit();
        query.offset = page.offset();
        Ok(query)
    }
}

#[derive(Serialize)]
pub struct SearchResponse {
    /// Query time in milliseconds
    pub took: u128,
    pub hits: SearchHits,
}

/// GET /search/?q=&type=&committee=&page=&per_page=
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.to_query()?;
    let started = Instant::now();
    let hits = SearchRepo::new(&state.pool).search(&query).await?;
    let took = started.elapsed().as_millis();

    tracing::debug!(q = query.term.as_str(), total = hits.total, took, "Search");
    Ok(Json(SearchResponse { took, hits }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/search/", get(search))
}
