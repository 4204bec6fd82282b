//! Database layer - connection pool, migrations and repositories
//!
//! - List operations return one page plus the total via `COUNT(*) OVER()`
//! - Related resources for detail views are loaded with one query each
//! - Integrity is left to the schema (foreign keys, cascades, uniques)

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
