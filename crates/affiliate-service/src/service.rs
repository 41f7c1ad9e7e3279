//! Affiliation service: the request / approve / reject / cancel / revoke /
//! remove state machine and the category listings.

use std::collections::HashMap;

use affiliate_core::error::{AffiliateError, AffiliateResult};
use affiliate_core::filter::{
    FilterType, REMOVABLE, REOPENABLE_BY_COUNTERPART, REOPENABLE_BY_REQUESTER,
};
use affiliate_core::models::affiliation::{Affiliation, AffiliationStatus, CreateAffiliation};
use affiliate_core::models::organization::{CreateOrganization, Organization, OrganizationId};
use affiliate_core::repository::{
    AffiliationQuery, AffiliationRepository, OrganizationRepository, PaginatedResult, Pagination,
    SortColumn, SortOrder,
};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::TransitionError;

/// Parameters of a category listing.
#[derive(Debug, Clone, Default)]
pub struct FilterRequest {
    /// Organization whose point of view the categories are evaluated from.
    pub organization_id: OrganizationId,
    pub filter_type: FilterType,
    pub search: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
    /// Zero-based page number.
    pub page: u64,
    pub page_size: u64,
}

/// Affiliation service.
///
/// Generic over repository implementations so that the state machine
/// has no dependency on the database crate.
pub struct AffiliationService<A: AffiliationRepository, O: OrganizationRepository> {
    affiliation_repo: A,
    organization_repo: O,
    config: ServiceConfig,
}

impl<A: AffiliationRepository, O: OrganizationRepository> AffiliationService<A, O> {
    pub fn new(affiliation_repo: A, organization_repo: O, config: ServiceConfig) -> Self {
        Self {
            affiliation_repo,
            organization_repo,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Raise an affiliation request from `input.requester_id` to
    /// `input.counterpart_id` on behalf of `caller_id`.
    ///
    /// A pair with a live record returns that record unchanged. A record
    /// the caller is entitled to re-raise from (a requester after cancel or
    /// own revoke, a counterpart after reject or own revoke) is removed
    /// first and replaced by a fresh request.
    pub async fn affiliate(
        &self,
        input: CreateAffiliation,
        caller_id: OrganizationId,
    ) -> AffiliateResult<Affiliation> {
        let current = self
            .check_affiliation(input.requester_id, input.counterpart_id)
            .await?;

        if current.status != AffiliationStatus::None {
            let reopenable = (current.is_counterpart(caller_id)
                && REOPENABLE_BY_COUNTERPART.contains(&current.status))
                || (current.is_requester(caller_id)
                    && REOPENABLE_BY_REQUESTER.contains(&current.status));

            if !reopenable {
                info!(
                    requester_id = input.requester_id,
                    counterpart_id = input.counterpart_id,
                    status = %current.status,
                    "Affiliation already exists"
                );
                return Ok(current);
            }

            // Every reopenable status is removable. A concurrent change to
            // the record since it was read refuses the whole request.
            self.transition(
                &current,
                AffiliationStatus::Removed,
                false,
                TransitionError::Request,
            )
            .await?;
        }

        let created = self.affiliation_repo.create(input).await?;
        info!(
            requester_id = created.requester_id,
            counterpart_id = created.counterpart_id,
            caller_id,
            "Affiliation requested"
        );
        Ok(created)
    }

    /// The active record for the unordered pair, or a `NONE` sentinel.
    pub async fn check_affiliation(
        &self,
        organization_id: OrganizationId,
        other_id: OrganizationId,
    ) -> AffiliateResult<Affiliation> {
        Ok(self
            .affiliation_repo
            .find_active_pair(organization_id, other_id)
            .await?
            .unwrap_or_else(|| Affiliation::none(organization_id, other_id)))
    }

    /// Accept a pending request. Only the counterpart may approve.
    pub async fn approve_affiliation(
        &self,
        organization_id: OrganizationId,
        requesting_organization_id: OrganizationId,
    ) -> AffiliateResult<Affiliation> {
        let current = self
            .check_affiliation(organization_id, requesting_organization_id)
            .await?;

        if current.status != AffiliationStatus::ActiveRequest
            || !current.is_counterpart(organization_id)
        {
            return Err(refuse(TransitionError::Approve, organization_id, &current));
        }
        self.transition(
            &current,
            AffiliationStatus::Affiliated,
            true,
            TransitionError::Approve,
        )
        .await
    }

    /// Decline a pending request. Only the counterpart may reject.
    pub async fn reject_affiliation(
        &self,
        organization_id: OrganizationId,
        requesting_organization_id: OrganizationId,
    ) -> AffiliateResult<Affiliation> {
        let current = self
            .check_affiliation(organization_id, requesting_organization_id)
            .await?;

        if current.status != AffiliationStatus::ActiveRequest
            || !current.is_counterpart(organization_id)
        {
            return Err(refuse(TransitionError::Reject, organization_id, &current));
        }
        self.transition(
            &current,
            AffiliationStatus::Rejected,
            true,
            TransitionError::Reject,
        )
        .await
    }

    /// Withdraw a pending request. Only the requester may cancel.
    pub async fn cancel_affiliation(
        &self,
        organization_id: OrganizationId,
        affiliated_organization_id: OrganizationId,
    ) -> AffiliateResult<Affiliation> {
        let current = self
            .check_affiliation(organization_id, affiliated_organization_id)
            .await?;

        if current.status != AffiliationStatus::ActiveRequest
            || !current.is_requester(organization_id)
        {
            return Err(refuse(TransitionError::Cancel, organization_id, &current));
        }
        self.transition(
            &current,
            AffiliationStatus::Cancelled,
            true,
            TransitionError::Cancel,
        )
        .await
    }

    /// End an established affiliation. The resulting status records which
    /// side revoked it.
    pub async fn revoke_affiliation(
        &self,
        organization_id: OrganizationId,
        affiliated_organization_id: OrganizationId,
    ) -> AffiliateResult<Affiliation> {
        let current = self
            .check_affiliation(organization_id, affiliated_organization_id)
            .await?;

        if current.status != AffiliationStatus::Affiliated {
            return Err(refuse(TransitionError::Revoke, organization_id, &current));
        }
        let next = if current.is_requester(organization_id) {
            AffiliationStatus::RevokedFrom
        } else {
            AffiliationStatus::RevokedTo
        };
        self.transition(&current, next, true, TransitionError::Revoke)
            .await
    }

    /// Deactivate a record in a terminal status, freeing the pair.
    pub async fn remove_affiliation(
        &self,
        organization_id: OrganizationId,
        affiliated_organization_id: OrganizationId,
    ) -> AffiliateResult<Affiliation> {
        let current = self
            .check_affiliation(organization_id, affiliated_organization_id)
            .await?;

        if !REMOVABLE.contains(&current.status) {
            return Err(refuse(TransitionError::Remove, organization_id, &current));
        }
        self.transition(
            &current,
            AffiliationStatus::Removed,
            false,
            TransitionError::Remove,
        )
        .await
    }

    /// Page through the caller's affiliations in one category.
    pub async fn filter_affiliations(
        &self,
        request: FilterRequest,
    ) -> AffiliateResult<PaginatedResult<Affiliation>> {
        let page_size = self.config.page_size(request.page_size);
        let query = AffiliationQuery::for_category(request.organization_id, request.filter_type)
            .with_search(request.search)
            .sorted_by(request.sort, request.order);

        self.affiliation_repo
            .query_page(query, Pagination::page(request.page, page_size))
            .await
    }

    /// Same listing as [`Self::filter_affiliations`], projected to the
    /// organization on the other side of each record.
    pub async fn filter_affiliated_organizations(
        &self,
        request: FilterRequest,
    ) -> AffiliateResult<PaginatedResult<Organization>> {
        let organization_id = request.organization_id;
        let page = self.filter_affiliations(request).await?;

        let other_ids: Vec<OrganizationId> = page
            .items
            .iter()
            .map(|a| a.other_party(organization_id))
            .collect();
        let mut organizations: HashMap<OrganizationId, Organization> = self
            .organization_repo
            .get_many(&other_ids)
            .await?
            .into_iter()
            .map(|org| (org.id, org))
            .collect();

        let items = other_ids
            .iter()
            .filter_map(|id| organizations.remove(id))
            .collect();

        Ok(PaginatedResult {
            items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    /// Register an organization so it can take part in affiliations.
    pub async fn register_organization(
        &self,
        input: CreateOrganization,
    ) -> AffiliateResult<Organization> {
        let organization = self.organization_repo.create(input).await?;
        info!(organization_id = organization.id, "Organization registered");
        Ok(organization)
    }

    pub async fn get_organization(&self, id: OrganizationId) -> AffiliateResult<Organization> {
        self.organization_repo.get_by_id(id).await
    }

    /// Apply a checked transition and reload the record.
    ///
    /// A zero row count means another caller changed the record after it
    /// was read; the transition is refused rather than retried.
    async fn transition(
        &self,
        current: &Affiliation,
        next: AffiliationStatus,
        active: bool,
        refusal: TransitionError,
    ) -> AffiliateResult<Affiliation> {
        let Some(id) = current.id else {
            return Err(refusal.into());
        };

        let changed = self
            .affiliation_repo
            .update_status(id, current.status, next, active)
            .await?;
        if changed == 0 {
            warn!(
                affiliation_id = %id,
                from = %current.status,
                to = %next,
                "Affiliation changed concurrently"
            );
            return Err(refusal.into());
        }

        let updated = self.affiliation_repo.get_by_id(id).await?;
        info!(
            affiliation_id = %id,
            from = %current.status,
            to = %updated.status,
            active = updated.active,
            "Affiliation status changed"
        );
        Ok(updated)
    }
}

fn refuse(
    refusal: TransitionError,
    organization_id: OrganizationId,
    current: &Affiliation,
) -> AffiliateError {
    warn!(
        organization_id,
        requester_id = current.requester_id,
        counterpart_id = current.counterpart_id,
        status = %current.status,
        "{refusal}"
    );
    refusal.into()
}
