//! Admin report endpoints
//!
//! Both routes require an editor's API key. A report is viewed as JSON
//! (first 500 rows) or, with `?format=xlsx`, downloaded in full as a
//! spreadsheet.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::Editor;
use crate::http::server::AppState;
use crate::models::ValidationError;
use crate::reports::{Cell, Report, VIEW_ROW_LIMIT};
use crate::xlsx;

/// Report listing entry
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<&Report> for ReportSummary {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportList {
    pub reports: Vec<ReportSummary>,
}

/// A report's results, truncated for display
#[derive(Debug, Serialize)]
pub struct ReportView {
    pub report: ReportSummary,
    pub keys: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub row_count: usize,
    pub truncated: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Xlsx,
}

impl ReportParams {
    fn format(&self) -> Result<Format, ValidationError> {
        match self.format.as_deref() {
            None | Some("") | Some("json") => Ok(Format::Json),
            Some("xlsx") => Ok(Format::Xlsx),
            Some(other) => Err(ValidationError::InvalidVariant {
                field: "format",
                value: other.to_string(),
            }),
        }
    }
}

/// `Content-Disposition` value for a report download
fn attachment(report: &Report) -> String {
    format!("attachment;filename={}.xlsx", report.filename())
}

/// GET /admin/reports/
async fn list_reports(
    State(state): State<Arc<AppState>>,
    Editor(_user): Editor,
) -> Json<ReportList> {
    Json(ReportList {
        reports: state.reports.iter().map(ReportSummary::from).collect(),
    })
}

/// GET /admin/reports/{id}[?format=xlsx]
async fn show_report(
    State(state): State<Arc<AppState>>,
    Editor(user): Editor,
    Path(id): Path<u32>,
    Query(params): Query<ReportParams>,
) -> Result<Response, ApiError> {
    let format = params.format()?;
    let report = state.reports.find(id)?;
    tracing::info!(report = id, user_id = user.id, ?format, "Report requested");

    let started = Instant::now();
    let response = match format {
        Format::Xlsx => {
            let bytes = report.as_xlsx(&state.pool, &state.calendar).await?;
            (
                [
                    (header::CONTENT_TYPE, xlsx::CONTENT_TYPE.to_string()),
                    (header::CONTENT_DISPOSITION, attachment(report)),
                ],
                bytes,
            )
                .into_response()
        }
        Format::Json => {
            let results = report.run(&state.pool, &state.calendar).await?;
            let row_count = results.row_count();
            let (rows, truncated) = results.truncated(VIEW_ROW_LIMIT);

            Json(ReportView {
                report: ReportSummary::from(report),
                rows: rows.to_vec(),
                keys: results.keys.clone(),
                row_count,
                truncated,
            })
            .into_response()
        }
    };

    tracing::debug!(report = id, elapsed_ms = started.elapsed().as_millis(), "Report done");
    Ok(response)
}

/// Admin report routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/reports/", get(list_reports))
        .route("/admin/reports/{id}", get(show_report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportRegistry;

    #[test]
    fn format_defaults_to_json() {
        assert_eq!(ReportParams::default().format().unwrap(), Format::Json);

        let xlsx = ReportParams {
            format: Some("xlsx".into()),
        };
        assert_eq!(xlsx.format().unwrap(), Format::Xlsx);

        let csv = ReportParams {
            format: Some("csv".into()),
        };
        assert!(csv.format().is_err());
    }

    #[test]
    fn download_header_uses_stripped_name() {
        let registry = ReportRegistry::standard();
        let report = registry.find(3).unwrap();
        assert_eq!(
            attachment(report),
            "attachment;filename=Committeemeetingsummary.xlsx"
        );
    }

    #[test]
    fn summary_copies_report_metadata() {
        let registry = ReportRegistry::standard();
        let summary = ReportSummary::from(registry.find(6).unwrap());
        assert_eq!(summary.id, 6);
        assert_eq!(summary.name, "Committee alert subscriptions");
    }
}
