//! Database-specific error types and conversions.

use affiliate_core::error::AffiliateError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Constraint violated: {0}")]
    Constraint(String),
}

impl DbError {
    /// Classify a statement failure reported by `check()`.
    ///
    /// Unique index hits and duplicate record ids are constraint
    /// violations; anything else is a storage failure.
    pub(crate) fn from_statement(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if is_constraint_message(&message) {
            DbError::Constraint(message)
        } else {
            DbError::Surreal(err)
        }
    }
}

fn is_constraint_message(message: &str) -> bool {
    (message.contains("Database index") && message.contains("already contains"))
        || (message.contains("Database record") && message.contains("already exists"))
}

impl From<DbError> for AffiliateError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AffiliateError::NotFound { entity, id },
            DbError::Constraint(msg) => AffiliateError::ConstraintViolation(msg),
            other => AffiliateError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_maps_to_constraint_violation() {
        let err: AffiliateError = DbError::Constraint("duplicate pair".into()).into();
        assert!(matches!(err, AffiliateError::ConstraintViolation(m) if m == "duplicate pair"));
    }

    #[test]
    fn unique_index_and_duplicate_record_are_constraints() {
        assert!(is_constraint_message(
            "Database index `idx_affiliation_pair_key` already contains '1:2', \
             with record `affiliation:abc`"
        ));
        assert!(is_constraint_message(
            "Database record `organization:1` already exists"
        ));
    }

    #[test]
    fn other_statement_failures_are_not_constraints() {
        assert!(!is_constraint_message(
            "Found 'BOGUS' for field `status`, with record `affiliation:abc`, \
             but field must conform to: $value IN [...]"
        ));
        assert!(!is_constraint_message("The query was not executed due to a failed transaction"));
    }

    #[test]
    fn corrupt_row_maps_to_database_error() {
        let err: AffiliateError = DbError::Corrupt("bad status".into()).into();
        assert!(matches!(err, AffiliateError::Database(_)));
    }
}
