//! Shape validation for affiliation requests.

use affiliate_core::error::{AffiliateError, AffiliateResult};
use affiliate_core::models::affiliation::CreateAffiliation;
use affiliate_core::models::organization::OrganizationId;

pub const INVALID_REQUESTER: &str = "Invalid Organization to request affiliation";
pub const INVALID_COUNTERPART: &str = "Invalid Organization to Affiliate With";
pub const SELF_AFFILIATION: &str = "An organization cannot affiliate with itself";

/// Check both organization references of a request body.
///
/// Every problem found is reported, not just the first.
pub fn validate_affiliation_request(
    requester_id: Option<OrganizationId>,
    counterpart_id: Option<OrganizationId>,
) -> AffiliateResult<CreateAffiliation> {
    let mut details = Vec::new();

    let requester = requester_id.filter(|id| *id > 0);
    if requester.is_none() {
        details.push(INVALID_REQUESTER.to_string());
    }
    let counterpart = counterpart_id.filter(|id| *id > 0);
    if counterpart.is_none() {
        details.push(INVALID_COUNTERPART.to_string());
    }

    match (requester, counterpart) {
        (Some(requester_id), Some(counterpart_id)) if requester_id == counterpart_id => {
            Err(AffiliateError::validation(vec![SELF_AFFILIATION.to_string()]))
        }
        (Some(requester_id), Some(counterpart_id)) => Ok(CreateAffiliation {
            requester_id,
            counterpart_id,
        }),
        _ => Err(AffiliateError::validation(details)),
    }
}

/// Check an organization id taken from a header or path.
pub fn validate_organization_id(id: OrganizationId) -> AffiliateResult<OrganizationId> {
    if id > 0 {
        Ok(id)
    } else {
        Err(AffiliateError::validation(vec![format!(
            "Invalid organization id: {id}"
        )]))
    }
}
