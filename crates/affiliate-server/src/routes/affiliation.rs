//! Affiliation endpoints. Every route acts on behalf of the organization
//! named in the `X-Organization-Id` header.

use affiliate_core::models::organization::OrganizationId;
use affiliate_service::FilterRequest;
use affiliate_service::validator::{validate_affiliation_request, validate_organization_id};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use tracing::info;

use crate::dto::{
    AffiliateBody, AffiliationResponse, FilterParams, OrganizationResponse, PageResponse,
};
use crate::error::AppError;
use crate::extract::CallerOrganization;
use crate::state::AppState;

type AffiliationResult = Result<Json<AffiliationResponse>, AppError>;

fn other_organization(path: Result<Path<i64>, PathRejection>) -> Result<OrganizationId, AppError> {
    let Path(id) = path?;
    Ok(validate_organization_id(id)?)
}

fn filter_request(caller: OrganizationId, params: FilterParams) -> FilterRequest {
    FilterRequest {
        organization_id: caller,
        filter_type: params.filter_type,
        search: params.query,
        sort: params.sort,
        order: params.order,
        page: params.page,
        page_size: params.offset,
    }
}

/// POST /affiliate
pub async fn affiliate(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    body: Result<Json<AffiliateBody>, JsonRejection>,
) -> AffiliationResult {
    let Json(body) = body?;
    let input = validate_affiliation_request(
        body.affiliation_from.and_then(|o| o.id),
        body.affiliation_with.and_then(|o| o.id),
    )?;

    info!(
        caller_id = caller,
        requester_id = input.requester_id,
        counterpart_id = input.counterpart_id,
        "Affiliation request received"
    );
    let affiliation = app.service.affiliate(input, caller).await?;
    Ok(Json(affiliation.into()))
}

/// GET /affiliate/check/{organization_id}
pub async fn check(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    other: Result<Path<i64>, PathRejection>,
) -> AffiliationResult {
    let other = other_organization(other)?;
    let affiliation = app.service.check_affiliation(caller, other).await?;
    Ok(Json(affiliation.into()))
}

/// POST /affiliate/approve/{organization_id}
pub async fn approve(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    other: Result<Path<i64>, PathRejection>,
) -> AffiliationResult {
    let other = other_organization(other)?;
    let affiliation = app.service.approve_affiliation(caller, other).await?;
    Ok(Json(affiliation.into()))
}

/// POST /affiliate/reject/{organization_id}
pub async fn reject(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    other: Result<Path<i64>, PathRejection>,
) -> AffiliationResult {
    let other = other_organization(other)?;
    let affiliation = app.service.reject_affiliation(caller, other).await?;
    Ok(Json(affiliation.into()))
}

/// POST /affiliate/cancel/{organization_id}
pub async fn cancel(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    other: Result<Path<i64>, PathRejection>,
) -> AffiliationResult {
    let other = other_organization(other)?;
    let affiliation = app.service.cancel_affiliation(caller, other).await?;
    Ok(Json(affiliation.into()))
}

/// POST /affiliate/revoke/{organization_id}
pub async fn revoke(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    other: Result<Path<i64>, PathRejection>,
) -> AffiliationResult {
    let other = other_organization(other)?;
    let affiliation = app.service.revoke_affiliation(caller, other).await?;
    Ok(Json(affiliation.into()))
}

/// POST /affiliate/remove/{organization_id}
pub async fn remove(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    other: Result<Path<i64>, PathRejection>,
) -> AffiliationResult {
    let other = other_organization(other)?;
    let affiliation = app.service.remove_affiliation(caller, other).await?;
    Ok(Json(affiliation.into()))
}

/// GET /affiliate/filter
pub async fn filter_affiliations(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<PageResponse<AffiliationResponse>>, AppError> {
    let Query(params) = params?;
    let page = params.page;
    let result = app
        .service
        .filter_affiliations(filter_request(caller, params))
        .await?;
    Ok(Json(PageResponse::from_result(page, result)))
}

/// GET /affiliate/organization/filter
pub async fn filter_organizations(
    State(app): State<AppState>,
    CallerOrganization(caller): CallerOrganization,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<PageResponse<OrganizationResponse>>, AppError> {
    let Query(params) = params?;
    let page = params.page;
    let result = app
        .service
        .filter_affiliated_organizations(filter_request(caller, params))
        .await?;
    Ok(Json(PageResponse::from_result(page, result)))
}
