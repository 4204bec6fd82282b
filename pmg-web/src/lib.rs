//! pmg-web: HTML frontend for the PMG parliamentary monitor
//!
//! Every page is rendered from documents fetched from the JSON API. The
//! visitor's API key travels in a cookie and is forwarded on each call.

pub mod analytics;
pub mod client;
pub mod error;
pub mod format;
pub mod html;
pub mod pagination;
pub mod server;
pub mod session;
pub mod views;

pub use client::{ApiClient, ClientError};
pub use error::WebError;
pub use server::{build_router, run_web, ServerError, WebState};
