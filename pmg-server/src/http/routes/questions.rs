//! Question reply endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::db::QuestionReplyRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{Pagination, PaginationParams, QuestionReply};
use crate::serializer::ListEnvelope;

const RESOURCE: &str = "question_reply";

/// GET /question_reply/
async fn list_replies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ListEnvelope<QuestionReply>>, ApiError> {
    let page = Pagination::from_params(params, state.results_per_page);
    let result = QuestionReplyRepo::new(&state.pool).list(page).await?;

    Ok(Json(ListEnvelope::new(
        result.items,
        result.total,
        result.page,
        state.results_per_page,
        &state.public_url,
        RESOURCE,
    )))
}

/// GET /question_reply/{id}/
async fn get_reply(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<QuestionReply>, ApiError> {
    Ok(Json(QuestionReplyRepo::new(&state.pool).get(id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/question_reply/", get(list_replies))
        .route("/question_reply/{id}/", get(get_reply))
}
