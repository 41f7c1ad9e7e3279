//! Affiliate Core: domain models, the affiliation filter-category table
//! and the repository traits shared by the store, the service and the
//! HTTP layer.

pub mod error;
pub mod filter;
pub mod models;
pub mod repository;

pub use error::{AffiliateError, AffiliateResult};
