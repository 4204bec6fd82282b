//! Committee meeting endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::db::CommitteeMeetingRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{Meeting, MeetingDetail, Pagination, PaginationParams};
use crate::serializer::ListEnvelope;

const RESOURCE: &str = "committee-meeting";

/// GET /committee-meeting/ - newest first
async fn list_meetings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ListEnvelope<Meeting>>, ApiError> {
    let page = Pagination::from_params(params, state.results_per_page);
    let result = CommitteeMeetingRepo::new(&state.pool).list(page).await?;

    Ok(Json(ListEnvelope::new(
        result.items,
        result.total,
        result.page,
        state.results_per_page,
        &state.public_url,
        RESOURCE,
    )))
}

/// GET /committee-meeting/{id}/
async fn get_meeting(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MeetingDetail>, ApiError> {
    let meeting = CommitteeMeetingRepo::new(&state.pool).get_with_content(id).await?;
    Ok(Json(meeting))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/committee-meeting/", get(list_meetings))
        .route("/committee-meeting/{id}/", get(get_meeting))
}
