//! Bill endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::db::BillRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{Bill, BillDetail, Pagination, PaginationParams};
use crate::serializer::ListEnvelope;

const RESOURCE: &str = "bill";

/// GET /bill/
async fn list_bills(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ListEnvelope<Bill>>, ApiError> {
    let page = Pagination::from_params(params, state.results_per_page);
    let result = BillRepo::new(&state.pool).list(page).await?;

    Ok(Json(ListEnvelope::new(
        result.items,
        result.total,
        result.page,
        state.results_per_page,
        &state.public_url,
        RESOURCE,
    )))
}

/// GET /bill/current/ - every bill still before Parliament or the
/// President, unpaginated
async fn current_bills(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListEnvelope<Bill>>, ApiError> {
    let bills = BillRepo::new(&state.pool).list_current().await?;
    Ok(Json(ListEnvelope::complete(bills)))
}

/// GET /bill/{id}/
async fn get_bill(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<BillDetail>, ApiError> {
    let bill = BillRepo::new(&state.pool).get(id).await?;
    Ok(Json(bill))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bill/", get(list_bills))
        .route("/bill/current/", get(current_bills))
        .route("/bill/{id}/", get(get_bill))
}
