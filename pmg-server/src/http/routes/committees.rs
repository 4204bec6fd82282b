//! Committee endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::db::CommitteeRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{Committee, CommitteeDetail, Pagination, PaginationParams};
use crate::serializer::ListEnvelope;

const RESOURCE: &str = "committee";

/// GET /committee/
async fn list_committees(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ListEnvelope<Committee>>, ApiError> {
    let page = Pagination::from_params(params, state.results_per_page);
    let result = CommitteeRepo::new(&state.pool).list(page).await?;

    Ok(Json(ListEnvelope::new(
        result.items,
        result.total,
        result.page,
        state.results_per_page,
        &state.public_url,
        RESOURCE,
    )))
}

/// GET /committee/{id}/ - with meetings, calls for comment, tabled
/// reports, questions and bills
async fn get_committee(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<CommitteeDetail>, ApiError> {
    let committee = CommitteeRepo::new(&state.pool).get_with_related(id).await?;
    Ok(Json(committee))
}

/// Committee routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/committee/", get(list_committees))
        .route("/committee/{id}/", get(get_committee))
}
