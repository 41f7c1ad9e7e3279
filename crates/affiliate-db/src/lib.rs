//! Affiliate Database: SurrealDB connection management, schema
//! migrations and repository implementations of the `affiliate-core`
//! traits.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - Repositories ([`repository::SurrealOrganizationRepository`],
//!   [`repository::SurrealAffiliationRepository`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
