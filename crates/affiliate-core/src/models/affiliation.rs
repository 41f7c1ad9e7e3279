//! Affiliation domain model.
//!
//! An affiliation links a requesting organization to a counterpart. The
//! record is directional (who asked whom) but lookups treat the pair as
//! unordered. Records are never deleted: removal sets a terminal status
//! and clears the `active` flag.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::organization::OrganizationId;

/// Lifecycle status of an affiliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliationStatus {
    /// No record exists for the pair. Never persisted.
    None,
    ActiveRequest,
    Affiliated,
    Rejected,
    Cancelled,
    /// Revoked by the original requester.
    RevokedFrom,
    /// Revoked by the original counterpart.
    RevokedTo,
    Removed,
    UnregisteredFrom,
    UnregisteredTo,
}

impl AffiliationStatus {
    /// Every status that can be stored.
    pub const PERSISTED: &'static [AffiliationStatus] = &[
        AffiliationStatus::ActiveRequest,
        AffiliationStatus::Affiliated,
        AffiliationStatus::Rejected,
        AffiliationStatus::Cancelled,
        AffiliationStatus::RevokedFrom,
        AffiliationStatus::RevokedTo,
        AffiliationStatus::Removed,
        AffiliationStatus::UnregisteredFrom,
        AffiliationStatus::UnregisteredTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AffiliationStatus::None => "NONE",
            AffiliationStatus::ActiveRequest => "ACTIVE_REQUEST",
            AffiliationStatus::Affiliated => "AFFILIATED",
            AffiliationStatus::Rejected => "REJECTED",
            AffiliationStatus::Cancelled => "CANCELLED",
            AffiliationStatus::RevokedFrom => "REVOKED_FROM",
            AffiliationStatus::RevokedTo => "REVOKED_TO",
            AffiliationStatus::Removed => "REMOVED",
            AffiliationStatus::UnregisteredFrom => "UNREGISTERED_FROM",
            AffiliationStatus::UnregisteredTo => "UNREGISTERED_TO",
        }
    }
}

impl fmt::Display for AffiliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown affiliation status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AffiliationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(AffiliationStatus::None),
            "ACTIVE_REQUEST" => Ok(AffiliationStatus::ActiveRequest),
            "AFFILIATED" => Ok(AffiliationStatus::Affiliated),
            "REJECTED" => Ok(AffiliationStatus::Rejected),
            "CANCELLED" => Ok(AffiliationStatus::Cancelled),
            "REVOKED_FROM" => Ok(AffiliationStatus::RevokedFrom),
            "REVOKED_TO" => Ok(AffiliationStatus::RevokedTo),
            "REMOVED" => Ok(AffiliationStatus::Removed),
            "UNREGISTERED_FROM" => Ok(AffiliationStatus::UnregisteredFrom),
            "UNREGISTERED_TO" => Ok(AffiliationStatus::UnregisteredTo),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// An affiliation between two organizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Store-assigned id. `None` only on the synthetic "no relationship"
    /// record returned by pair lookups.
    pub id: Option<Uuid>,
    /// Organization that raised the request (`affiliationFrom`).
    pub requester_id: OrganizationId,
    /// Organization the request was raised with (`affiliationWith`).
    pub counterpart_id: OrganizationId,
    pub status: AffiliationStatus,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Affiliation {
    /// The sentinel returned when no active record exists for a pair.
    pub fn none(requester_id: OrganizationId, counterpart_id: OrganizationId) -> Self {
        Self {
            id: None,
            requester_id,
            counterpart_id,
            status: AffiliationStatus::None,
            active: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_requester(&self, organization_id: OrganizationId) -> bool {
        self.requester_id == organization_id
    }

    pub fn is_counterpart(&self, organization_id: OrganizationId) -> bool {
        self.counterpart_id == organization_id
    }

    /// The organization on the opposite side from `organization_id`.
    ///
    /// Returns the counterpart when `organization_id` is the requester and
    /// the requester otherwise.
    pub fn other_party(&self, organization_id: OrganizationId) -> OrganizationId {
        if self.is_requester(organization_id) {
            self.counterpart_id
        } else {
            self.requester_id
        }
    }
}

/// Fields required to raise a new affiliation request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreateAffiliation {
    pub requester_id: OrganizationId,
    pub counterpart_id: OrganizationId,
}

/// Canonical key for the unordered pair `{a, b}`.
pub fn pair_key(a: OrganizationId, b: OrganizationId) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    format!("{low}:{high}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_round_trips() {
        for status in AffiliationStatus::PERSISTED {
            assert_eq!(status.as_str().parse::<AffiliationStatus>(), Ok(*status));
        }
        assert!("PENDING".parse::<AffiliationStatus>().is_err());
    }

    #[test]
    fn status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&AffiliationStatus::RevokedFrom).unwrap();
        assert_eq!(json, "\"REVOKED_FROM\"");
    }

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(pair_key(7, 3), "3:7");
        assert_eq!(pair_key(3, 7), "3:7");
    }

    #[test]
    fn other_party_follows_side() {
        let affiliation = Affiliation {
            status: AffiliationStatus::Affiliated,
            ..Affiliation::none(1, 2)
        };
        assert_eq!(affiliation.other_party(1), 2);
        assert_eq!(affiliation.other_party(2), 1);
    }
}
