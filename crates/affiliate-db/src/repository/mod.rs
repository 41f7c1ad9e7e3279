//! SurrealDB repository implementations.

mod affiliation;
mod organization;

pub use affiliation::SurrealAffiliationRepository;
pub use organization::SurrealOrganizationRepository;
