//! Hansard and briefing endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::ProceedingRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::ProceedingDetail;

/// GET /hansard/{id}/
async fn get_hansard(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<ProceedingDetail>, ApiError> {
    Ok(Json(ProceedingRepo::hansards(&state.pool).get(id).await?))
}

/// GET /briefing/{id}/
async fn get_briefing(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<ProceedingDetail>, ApiError> {
    Ok(Json(ProceedingRepo::briefings(&state.pool).get(id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hansard/{id}/", get(get_hansard))
        .route("/briefing/{id}/", get(get_briefing))
}
