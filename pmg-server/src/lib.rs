//! pmg-server: JSON API for the PMG parliamentary monitor
//!
//! Exposes committees, committee meetings, bills, members, hansards,
//! briefings, question replies and search as paginated JSON, plus the
//! admin reporting endpoints with spreadsheet export.

pub mod db;
pub mod http;
pub mod models;
pub mod reports;
pub mod serializer;
pub mod tasks;
pub mod xlsx;

pub use db::{create_pool, DbError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
pub use reports::{Report, ReportRegistry, ResultSet};
