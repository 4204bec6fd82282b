//! pmg-core: shared building blocks for the PMG parliamentary monitor
//!
//! Configuration, the core error type, and the small helpers used by both
//! the API server and the web frontend (string similarity, province slugs,
//! URL externalisation, parliamentary-day counting, analytics payloads).

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod error;
pub mod text;
pub mod urls;

pub use analytics::{client_id_from_ga_cookie, is_bot, Pageview};
pub use calendar::ParliamentaryCalendar;
pub use config::PmgConfig;
pub use error::{PmgError, Result};
pub use text::{deslugify_province, edit_distance, levenshtein_ratio, slugify_province};
pub use urls::externalise_url;
