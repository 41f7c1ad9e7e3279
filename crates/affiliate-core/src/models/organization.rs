//! Organization domain model.
//!
//! Organizations are owned by an external registry. Only identity and the
//! two columns used for searching and sorting affiliation listings are
//! kept here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Integer identifier assigned by the organization registry.
pub type OrganizationId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Name of the parent health system, if any.
    pub health_system_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub id: OrganizationId,
    pub name: String,
    pub health_system_name: Option<String>,
}
