//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The affiliation store never
//! decides transitions; it only reads, creates and conditionally updates
//! records on behalf of the service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AffiliateResult;
use crate::filter::FilterType;
use crate::models::affiliation::{Affiliation, AffiliationStatus, CreateAffiliation};
use crate::models::organization::{CreateOrganization, Organization, OrganizationId};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    /// Zero-based page number and page size.
    pub fn page(page: u64, size: u64) -> Self {
        Self {
            offset: page.saturating_mul(size),
            limit: size,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Organization column an affiliation listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    #[default]
    Name,
    HealthSystemName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

/// Filter for affiliation listings.
///
/// Matches records where `organization_id` is the requester with a status
/// in `requester_statuses`, or the counterpart with a status in
/// `counterpart_statuses`. Search and sort apply to the other organization
/// of each record.
#[derive(Debug, Clone)]
pub struct AffiliationQuery {
    pub active: bool,
    pub organization_id: OrganizationId,
    pub requester_statuses: Vec<AffiliationStatus>,
    pub counterpart_statuses: Vec<AffiliationStatus>,
    /// Case-sensitive substring of the other organization's name or
    /// health-system name. Empty matches everything.
    pub search: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
}

impl AffiliationQuery {
    /// Active records for `organization_id` in the given category.
    pub fn for_category(organization_id: OrganizationId, filter_type: FilterType) -> Self {
        let sets = filter_type.status_sets();
        Self {
            active: true,
            organization_id,
            requester_statuses: sets.as_requester.to_vec(),
            counterpart_statuses: sets.as_counterpart.to_vec(),
            search: None,
            sort: SortColumn::default(),
            order: SortOrder::default(),
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.is_empty());
        self
    }

    pub fn sorted_by(mut self, sort: SortColumn, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = AffiliateResult<Organization>> + Send;
    fn get_by_id(
        &self,
        id: OrganizationId,
    ) -> impl Future<Output = AffiliateResult<Organization>> + Send;
    /// Batch lookup. Unknown ids are skipped; order is unspecified.
    fn get_many(
        &self,
        ids: &[OrganizationId],
    ) -> impl Future<Output = AffiliateResult<Vec<Organization>>> + Send;
}

// ---------------------------------------------------------------------------
// Affiliations
// ---------------------------------------------------------------------------

pub trait AffiliationRepository: Send + Sync {
    /// Persist a new `ACTIVE_REQUEST` record.
    ///
    /// Fails with `InvalidAffiliateWith` when the counterpart does not
    /// exist and `ConstraintViolation` when the requester does not exist or
    /// the pair already has an active record.
    fn create(
        &self,
        input: CreateAffiliation,
    ) -> impl Future<Output = AffiliateResult<Affiliation>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AffiliateResult<Affiliation>> + Send;
    /// The active record for the unordered pair `{a, b}`, if any.
    fn find_active_pair(
        &self,
        a: OrganizationId,
        b: OrganizationId,
    ) -> impl Future<Output = AffiliateResult<Option<Affiliation>>> + Send;
    /// Move an active record from `expected` to `status`, setting `active`.
    ///
    /// Returns the number of rows changed. Zero means the record was no
    /// longer active or no longer in `expected`.
    fn update_status(
        &self,
        id: Uuid,
        expected: AffiliationStatus,
        status: AffiliationStatus,
        active: bool,
    ) -> impl Future<Output = AffiliateResult<u64>> + Send;
    /// One page of records matching `query`, searched and sorted on the
    /// organization on the other side of each record.
    fn query_page(
        &self,
        query: AffiliationQuery,
        pagination: Pagination,
    ) -> impl Future<Output = AffiliateResult<PaginatedResult<Affiliation>>> + Send;
}
