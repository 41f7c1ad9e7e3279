//! Request extractors.

use affiliate_core::models::organization::OrganizationId;
use affiliate_service::validator::validate_organization_id;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// Header naming the organization on whose behalf a request is made.
pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// The calling organization, taken from the `X-Organization-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerOrganization(pub OrganizationId);

impl<S: Send + Sync> FromRequestParts<S> for CallerOrganization {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ORGANIZATION_HEADER)
            .ok_or_else(|| AppError::Malformed("Missing X-Organization-Id header".into()))?;

        let id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<OrganizationId>().ok())
            .ok_or_else(|| AppError::Malformed("Invalid X-Organization-Id header".into()))?;

        Ok(Self(validate_organization_id(id)?))
    }
}
