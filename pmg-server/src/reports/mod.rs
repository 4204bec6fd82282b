//! Admin reports
//!
//! A report is a named SQL statement, optionally followed by a transform
//! over its result set. Reports are viewed as JSON (first 500 rows) or
//! downloaded as a spreadsheet.

mod catalog;
pub mod result;
pub mod transform;

pub use result::{Cell, ResultSet};

use pmg_core::ParliamentaryCalendar;
use sqlx::{Column, Executor, PgPool, Statement};

/// Rows shown when viewing a report; exports are not truncated
pub const VIEW_ROW_LIMIT: usize = 500;

/// Post-processing step applied to a report's rows
pub type Transform = fn(ResultSet, &ParliamentaryCalendar) -> ResultSet;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report {0} not found")]
    NotFound(u32),

    #[error("report query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("spreadsheet export failed: {0}")]
    Export(#[from] crate::xlsx::XlsxError),
}

#[derive(Debug, Clone)]
pub struct Report {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub sql: &'static str,
    pub transform: Option<Transform>,
}

impl Report {
    /// Apply the transform, if any.
    pub fn process(&self, results: ResultSet, calendar: &ParliamentaryCalendar) -> ResultSet {
        match self.transform {
            Some(transform) => transform(results, calendar),
            None => results,
        }
    }

    pub async fn run(
        &self,
        pool: &PgPool,
        calendar: &ParliamentaryCalendar,
    ) -> Result<ResultSet, ReportError> {
        tracing::info!(report = self.id, name = self.name, "Running report");
        let statement = pool.prepare(self.sql).await?;
        let keys = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let rows = statement.query().fetch_all(pool).await?;
        let results = ResultSet::from_rows(keys, &rows)?;
        Ok(self.process(results, calendar))
    }

    /// Run and export as an xlsx workbook.
    pub async fn as_xlsx(
        &self,
        pool: &PgPool,
        calendar: &ParliamentaryCalendar,
    ) -> Result<Vec<u8>, ReportError> {
        let results = self.run(pool, calendar).await?;
        Ok(crate::xlsx::XlsxBuilder::new(self.name).from_result_set(&results)?)
    }

    /// Download file name: the report name with only ASCII letters and
    /// digits kept.
    pub fn filename(&self) -> String {
        self.name.chars().filter(char::is_ascii_alphanumeric).collect()
    }
}

/// Lookup of the available reports by id
#[derive(Debug, Clone)]
pub struct ReportRegistry {
    reports: Vec<Report>,
}

impl ReportRegistry {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    /// The reports shipped with the admin interface.
    pub fn standard() -> Self {
        Self::new(catalog::standard_reports())
    }

    pub fn find(&self, id: u32) -> Result<&Report, ReportError> {
        self.reports
            .iter()
            .find(|r| r.id == id)
            .ok_or(ReportError::NotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
