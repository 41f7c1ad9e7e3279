//! SurrealDB implementation of [`AffiliationRepository`].
//!
//! Pair lookups go through the `pair_key` column, which is unique across
//! the table. Status updates are conditional on the status the caller last
//! observed, so a stale read never overwrites a concurrent transition.
//! Listings are searched, sorted, counted and paged in the database,
//! reaching the other organization through the `requester`/`counterpart`
//! record links.

use affiliate_core::error::{AffiliateError, AffiliateResult};
use affiliate_core::models::affiliation::{
    Affiliation, AffiliationStatus, CreateAffiliation, pair_key,
};
use affiliate_core::models::organization::OrganizationId;
use affiliate_core::repository::{
    AffiliationQuery, AffiliationRepository, PaginatedResult, Pagination, SortColumn, SortOrder,
};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::organization::organization_exists;
use crate::error::DbError;

const SELECT_WITH_ID: &str = "SELECT meta::id(id) AS record_id, * FROM affiliation";

/// Matching records for one organization, each with the id, name and
/// health-system name of the organization on the other side.
const LISTING_SOURCE: &str = "\
    SELECT meta::id(id) AS record_id, requester_id, counterpart_id, status, active, \
        created_at, updated_at, \
        (IF requester_id = $organization_id { counterpart_id } ELSE { requester_id }) \
            AS other_id, \
        (IF requester_id = $organization_id { counterpart.name } ELSE { requester.name }) \
            AS other_name, \
        (IF requester_id = $organization_id { counterpart.health_system_name } \
            ELSE { requester.health_system_name }) AS other_health_system_name \
    FROM affiliation \
    WHERE active = $active AND (\
        (requester_id = $organization_id AND status IN $requester_statuses) \
        OR (counterpart_id = $organization_id AND status IN $counterpart_statuses))";

const LISTING_SEARCH: &str = "\
    !$search \
    OR other_name CONTAINS $search \
    OR other_health_system_name CONTAINS $search";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AffiliationRow {
    requester_id: i64,
    counterpart_id: i64,
    status: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AffiliationRow {
    fn into_affiliation(self, id: Uuid) -> Result<Affiliation, DbError> {
        Ok(Affiliation {
            id: Some(id),
            requester_id: self.requester_id,
            counterpart_id: self.counterpart_id,
            status: parse_status(&self.status)?,
            active: self.active,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AffiliationRowWithId {
    record_id: String,
    requester_id: i64,
    counterpart_id: i64,
    status: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AffiliationRowWithId {
    fn try_into_affiliation(self) -> Result<Affiliation, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(Affiliation {
            id: Some(id),
            requester_id: self.requester_id,
            counterpart_id: self.counterpart_id,
            status: parse_status(&self.status)?,
            active: self.active,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<AffiliationStatus, DbError> {
    match s.parse() {
        Ok(AffiliationStatus::None) => Err(DbError::Corrupt("NONE status persisted".into())),
        Ok(status) => Ok(status),
        Err(e) => Err(DbError::Corrupt(e.to_string())),
    }
}

fn status_strings(statuses: &[AffiliationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

fn sort_field(column: SortColumn) -> &'static str {
    match column {
        SortColumn::Name => "other_name",
        SortColumn::HealthSystemName => "other_health_system_name",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Affiliation repository.
#[derive(Clone)]
pub struct SurrealAffiliationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAffiliationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AffiliationRepository for SurrealAffiliationRepository<C> {
    async fn create(&self, input: CreateAffiliation) -> AffiliateResult<Affiliation> {
        if !organization_exists(&self.db, input.counterpart_id).await? {
            return Err(AffiliateError::InvalidAffiliateWith(format!(
                "organization {} does not exist",
                input.counterpart_id
            )));
        }
        if !organization_exists(&self.db, input.requester_id).await? {
            return Err(AffiliateError::ConstraintViolation(format!(
                "requesting organization {} does not exist",
                input.requester_id
            )));
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('affiliation', $id) SET \
                 requester_id = $requester_id, \
                 counterpart_id = $counterpart_id, \
                 status = $status, \
                 active = true, \
                 pair_key = $pair_key, \
                 requester = type::record('organization', $requester_id), \
                 counterpart = type::record('organization', $counterpart_id)",
            )
            .bind(("id", id_str.clone()))
            .bind(("requester_id", input.requester_id))
            .bind(("counterpart_id", input.counterpart_id))
            .bind((
                "status",
                AffiliationStatus::ActiveRequest.as_str().to_string(),
            ))
            .bind((
                "pair_key",
                pair_key(input.requester_id, input.counterpart_id),
            ))
            .await
            .map_err(DbError::from)?;

        // The unique pair_key index rejects a second active record.
        let mut result = result.check().map_err(DbError::from_statement)?;

        let rows: Vec<AffiliationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "affiliation".into(),
            id: id_str,
        })?;

        Ok(row.into_affiliation(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AffiliateResult<Affiliation> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('affiliation', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AffiliationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "affiliation".into(),
            id: id_str,
        })?;

        Ok(row.into_affiliation(id)?)
    }

    async fn find_active_pair(
        &self,
        a: OrganizationId,
        b: OrganizationId,
    ) -> AffiliateResult<Option<Affiliation>> {
        let sql = format!("{SELECT_WITH_ID} WHERE pair_key = $pair_key AND active = true LIMIT 1");

        let mut result = self
            .db
            .query(&sql)
            .bind(("pair_key", pair_key(a, b)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AffiliationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(AffiliationRowWithId::try_into_affiliation)
            .transpose()?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AffiliationStatus,
        status: AffiliationStatus,
        active: bool,
    ) -> AffiliateResult<u64> {
        let id_str = id.to_string();

        // A deactivated record gives up the pair key so the pair can be
        // requested again.
        let query = if active {
            "UPDATE type::record('affiliation', $id) SET \
             status = $status, updated_at = time::now() \
             WHERE active = true AND status = $expected"
        } else {
            "UPDATE type::record('affiliation', $id) SET \
             status = $status, active = false, pair_key = $id, \
             updated_at = time::now() \
             WHERE active = true AND status = $expected"
        };

        let result = self
            .db
            .query(query)
            .bind(("id", id_str))
            .bind(("status", status.as_str().to_string()))
            .bind(("expected", expected.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from_statement)?;

        let rows: Vec<AffiliationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.len() as u64)
    }

    async fn query_page(
        &self,
        query: AffiliationQuery,
        pagination: Pagination,
    ) -> AffiliateResult<PaginatedResult<Affiliation>> {
        debug!(
            organization_id = query.organization_id,
            requester_statuses = ?query.requester_statuses,
            counterpart_statuses = ?query.counterpart_statuses,
            search = ?query.search,
            "Querying affiliations"
        );

        // Ties fall back to the other organization's id so pages are stable.
        let sql = format!(
            "SELECT count() AS total FROM ({LISTING_SOURCE}) WHERE {LISTING_SEARCH} GROUP ALL; \
             SELECT * FROM ({LISTING_SOURCE}) WHERE {LISTING_SEARCH} \
             ORDER BY {field} {direction}, other_id ASC \
             LIMIT $limit START $offset;",
            field = sort_field(query.sort),
            direction = sort_direction(query.order),
        );

        let mut result = self
            .db
            .query(&sql)
            .bind(("active", query.active))
            .bind(("organization_id", query.organization_id))
            .bind(("requester_statuses", status_strings(&query.requester_statuses)))
            .bind((
                "counterpart_statuses",
                status_strings(&query.counterpart_statuses),
            ))
            .bind(("search", query.search))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let rows: Vec<AffiliationRowWithId> = result.take(1).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(AffiliationRowWithId::try_into_affiliation)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_maps_to_other_side_columns() {
        assert_eq!(sort_field(SortColumn::Name), "other_name");
        assert_eq!(
            sort_field(SortColumn::HealthSystemName),
            "other_health_system_name"
        );
        assert_eq!(sort_direction(SortOrder::Desc), "DESC");
    }

    #[test]
    fn listing_projects_other_side_fields() {
        for field in ["other_id", "other_name", "other_health_system_name"] {
            assert!(LISTING_SOURCE.contains(&format!("AS {field}")));
        }
    }
}
