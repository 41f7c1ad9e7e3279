use std::sync::Arc;

use affiliate_db::repository::{SurrealAffiliationRepository, SurrealOrganizationRepository};
use affiliate_service::{AffiliationService, ServiceConfig};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

/// The service as wired against SurrealDB.
pub type Service =
    AffiliationService<SurrealAffiliationRepository<Any>, SurrealOrganizationRepository<Any>>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, config: ServiceConfig) -> Self {
        let service = AffiliationService::new(
            SurrealAffiliationRepository::new(db.clone()),
            SurrealOrganizationRepository::new(db),
            config,
        );
        Self {
            service: Arc::new(service),
        }
    }
}
