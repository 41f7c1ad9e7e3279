//! Domain models for organizations and their affiliations.

pub mod affiliation;
pub mod organization;
