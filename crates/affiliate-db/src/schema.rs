//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. Organization records are
//! keyed by their integer registry id; affiliation records by a UUID
//! string. Statuses are stored as strings with ASSERT constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "affiliation_listing_indexes",
        sql: SCHEMA_V2,
    },
    Migration {
        version: 3,
        name: "affiliation_organization_links",
        sql: SCHEMA_V3,
    },
];

// -----------------------------------------------------------------------
// Schema v1: organizations and affiliations
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (mirrored from the organization registry)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD health_system_name ON TABLE organization \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Affiliations
-- pair_key holds 'low:high' while active and the record id once
-- deactivated, so the unique index allows one active record per pair.
-- =======================================================================
DEFINE TABLE affiliation SCHEMAFULL;
DEFINE FIELD requester_id ON TABLE affiliation TYPE int;
DEFINE FIELD counterpart_id ON TABLE affiliation TYPE int;
DEFINE FIELD status ON TABLE affiliation TYPE string \
    ASSERT $value IN ['ACTIVE_REQUEST', 'AFFILIATED', 'REJECTED', \
    'CANCELLED', 'REVOKED_FROM', 'REVOKED_TO', 'REMOVED', \
    'UNREGISTERED_FROM', 'UNREGISTERED_TO'];
DEFINE FIELD active ON TABLE affiliation TYPE bool DEFAULT true;
DEFINE FIELD pair_key ON TABLE affiliation TYPE string;
DEFINE FIELD created_at ON TABLE affiliation TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE affiliation TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_affiliation_pair_key ON TABLE affiliation \
    COLUMNS pair_key UNIQUE;
";

// -----------------------------------------------------------------------
// Schema v2: listing indexes
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE INDEX idx_affiliation_requester ON TABLE affiliation \
    COLUMNS requester_id, active;
DEFINE INDEX idx_affiliation_counterpart ON TABLE affiliation \
    COLUMNS counterpart_id, active;
";

// -----------------------------------------------------------------------
// Schema v3: record links to both organizations
// -----------------------------------------------------------------------

/// Listings search and sort on the other organization's columns, which
/// are reached through these links.
const SCHEMA_V3: &str = "\
DEFINE FIELD requester ON TABLE affiliation TYPE record<organization>;
DEFINE FIELD counterpart ON TABLE affiliation TYPE record<organization>;
UPDATE affiliation SET \
    requester = type::record('organization', requester_id), \
    counterpart = type::record('organization', counterpart_id);
";

/// Run all pending migrations against the given database.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
