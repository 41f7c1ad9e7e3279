//! Wire shapes for request and response bodies.

use affiliate_core::filter::FilterType;
use affiliate_core::models::affiliation::{Affiliation, AffiliationStatus};
use affiliate_core::models::organization::{Organization, OrganizationId};
use affiliate_core::repository::{PaginatedResult, SortColumn, SortOrder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRef {
    pub id: Option<OrganizationId>,
}

/// Body of `POST /affiliate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateBody {
    pub affiliation_from: Option<OrganizationRef>,
    pub affiliation_with: Option<OrganizationRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliationResponse {
    pub id: Option<Uuid>,
    pub affiliation_from: OrganizationRef,
    pub affiliation_with: OrganizationRef,
    pub status: AffiliationStatus,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Affiliation> for AffiliationResponse {
    fn from(a: Affiliation) -> Self {
        Self {
            id: a.id,
            affiliation_from: OrganizationRef {
                id: Some(a.requester_id),
            },
            affiliation_with: OrganizationRef {
                id: Some(a.counterpart_id),
            },
            status: a.status,
            active: a.active,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: OrganizationId,
    pub name: String,
    pub health_system_name: Option<String>,
}

impl From<Organization> for OrganizationResponse {
    fn from(o: Organization) -> Self {
        Self {
            id: o.id,
            name: o.name,
            health_system_name: o.health_system_name,
        }
    }
}

/// Body of `POST /organization`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOrganizationBody {
    pub id: OrganizationId,
    pub name: String,
    #[serde(default)]
    pub health_system_name: Option<String>,
}

/// One page of a listing. `offset` echoes the effective page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub offset: u64,
    pub total_count: u64,
}

impl<T> PageResponse<T> {
    pub fn from_result<U: Into<T>>(page: u64, result: PaginatedResult<U>) -> Self {
        Self {
            data: result.items.into_iter().map(Into::into).collect(),
            page,
            offset: result.limit,
            total_count: result.total,
        }
    }
}

/// Query string of the listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterParams {
    pub page: u64,
    pub offset: u64,
    pub query: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
    pub filter_type: FilterType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affiliation_serializes_in_camel_case() {
        let mut affiliation = Affiliation::none(3, 5);
        affiliation.status = AffiliationStatus::RevokedTo;
        let json = serde_json::to_value(AffiliationResponse::from(affiliation)).unwrap();

        assert_eq!(json["affiliationFrom"]["id"], 3);
        assert_eq!(json["affiliationWith"]["id"], 5);
        assert_eq!(json["status"], "REVOKED_TO");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn body_tolerates_missing_sides() {
        let body: AffiliateBody =
            serde_json::from_str(r#"{"affiliationWith":{"id":4}}"#).unwrap();
        assert!(body.affiliation_from.is_none());
        assert_eq!(body.affiliation_with.and_then(|o| o.id), Some(4));
    }
}
