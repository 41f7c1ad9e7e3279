//! SurrealDB implementation of [`OrganizationRepository`].

use affiliate_core::error::AffiliateResult;
use affiliate_core::models::organization::{CreateOrganization, Organization, OrganizationId};
use affiliate_core::repository::OrganizationRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    name: String,
    health_system_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrganizationRow {
    fn into_organization(self, id: OrganizationId) -> Organization {
        Organization {
            id,
            name: self.name,
            health_system_name: self.health_system_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: i64,
    name: String,
    health_system_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrganizationRowWithId {
    fn into_organization(self) -> Organization {
        Organization {
            id: self.record_id,
            name: self.name,
            health_system_name: self.health_system_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Load the organizations with the given ids. Unknown ids are skipped.
async fn fetch_organizations<C: Connection>(
    db: &Surreal<C>,
    ids: &[OrganizationId],
) -> Result<Vec<Organization>, DbError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut result = db
        .query(
            "SELECT meta::id(id) AS record_id, * FROM organization \
             WHERE meta::id(id) IN $ids",
        )
        .bind(("ids", ids.to_vec()))
        .await?;

    let rows: Vec<OrganizationRowWithId> = result.take(0)?;
    Ok(rows.into_iter().map(OrganizationRowWithId::into_organization).collect())
}

/// Whether an organization record exists.
pub(crate) async fn organization_exists<C: Connection>(
    db: &Surreal<C>,
    id: OrganizationId,
) -> Result<bool, DbError> {
    Ok(!fetch_organizations(db, &[id]).await?.is_empty())
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> AffiliateResult<Organization> {
        let id = input.id;

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 name = $name, health_system_name = $health_system_name",
            )
            .bind(("id", id))
            .bind(("name", input.name))
            .bind(("health_system_name", input.health_system_name))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_statement)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_organization(id))
    }

    async fn get_by_id(&self, id: OrganizationId) -> AffiliateResult<Organization> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_organization(id))
    }

    async fn get_many(&self, ids: &[OrganizationId]) -> AffiliateResult<Vec<Organization>> {
        Ok(fetch_organizations(&self.db, ids).await?)
    }
}
