//! Affiliate Server: HTTP surface for the affiliation service.

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use state::AppState;

/// Build the application router around a prepared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        // Affiliations
        .route("/affiliate", post(routes::affiliation::affiliate))
        .route(
            "/affiliate/filter",
            get(routes::affiliation::filter_affiliations),
        )
        .route(
            "/affiliate/organization/filter",
            get(routes::affiliation::filter_organizations),
        )
        .route(
            "/affiliate/check/{organization_id}",
            get(routes::affiliation::check),
        )
        .route(
            "/affiliate/approve/{organization_id}",
            post(routes::affiliation::approve),
        )
        .route(
            "/affiliate/reject/{organization_id}",
            post(routes::affiliation::reject),
        )
        .route(
            "/affiliate/cancel/{organization_id}",
            post(routes::affiliation::cancel),
        )
        .route(
            "/affiliate/revoke/{organization_id}",
            post(routes::affiliation::revoke),
        )
        .route(
            "/affiliate/remove/{organization_id}",
            post(routes::affiliation::remove),
        )
        // Organizations
        .route("/organization", post(routes::organization::register))
        .route(
            "/organization/{organization_id}",
            get(routes::organization::get_organization),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
