//! Affiliate Service: the affiliation state machine and the filtered
//! listings derived from it.

pub mod config;
pub mod error;
pub mod service;
pub mod validator;

pub use config::ServiceConfig;
pub use error::TransitionError;
pub use service::{AffiliationService, FilterRequest};
