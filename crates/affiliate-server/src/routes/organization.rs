use affiliate_core::models::organization::CreateOrganization;
use affiliate_service::validator::validate_organization_id;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};

use crate::dto::{OrganizationResponse, RegisterOrganizationBody};
use crate::error::AppError;
use crate::state::AppState;

/// POST /organization
pub async fn register(
    State(app): State<AppState>,
    body: Result<Json<RegisterOrganizationBody>, JsonRejection>,
) -> Result<Json<OrganizationResponse>, AppError> {
    let Json(body) = body?;
    let id = validate_organization_id(body.id)?;

    let organization = app
        .service
        .register_organization(CreateOrganization {
            id,
            name: body.name,
            health_system_name: body.health_system_name,
        })
        .await?;
    Ok(Json(organization.into()))
}

/// GET /organization/{organization_id}
pub async fn get_organization(
    State(app): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<OrganizationResponse>, AppError> {
    let Path(id) = id?;
    let organization = app
        .service
        .get_organization(validate_organization_id(id)?)
        .await?;
    Ok(Json(organization.into()))
}
