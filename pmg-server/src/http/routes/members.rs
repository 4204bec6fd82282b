//! Member endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::db::MemberRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{Member, MemberDetail, Pagination, PaginationParams};
use crate::serializer::ListEnvelope;

const RESOURCE: &str = "member";

/// GET /member/
async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ListEnvelope<Member>>, ApiError> {
    let page = Pagination::from_params(params, state.results_per_page);
    let result = MemberRepo::new(&state.pool).list(page).await?;

    Ok(Json(ListEnvelope::new(
        result.items,
        result.total,
        result.page,
        state.results_per_page,
        &state.public_url,
        RESOURCE,
    )))
}

/// GET /member/{id}/ - with bio and the questions they asked
async fn get_member(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MemberDetail>, ApiError> {
    let member = MemberRepo::new(&state.pool).get(id).await?;
    Ok(Json(member))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/member/", get(list_members))
        .route("/member/{id}/", get(get_member))
}
