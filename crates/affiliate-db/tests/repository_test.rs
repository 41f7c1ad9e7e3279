//! Integration tests for the Organization and Affiliation repository
//! implementations using in-memory SurrealDB.

use affiliate_core::error::AffiliateError;
use affiliate_core::filter::FilterType;
use affiliate_core::models::affiliation::{AffiliationStatus, CreateAffiliation};
use affiliate_core::models::organization::CreateOrganization;
use affiliate_core::repository::{
    AffiliationQuery, AffiliationRepository, OrganizationRepository, Pagination, SortColumn,
    SortOrder,
};
use affiliate_db::repository::{SurrealAffiliationRepository, SurrealOrganizationRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

/// Helper: spin up in-memory DB, run migrations and register organizations.
async fn setup(
    orgs: &[(i64, &str, Option<&str>)],
) -> (
    SurrealOrganizationRepository<Db>,
    SurrealAffiliationRepository<Db>,
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    affiliate_db::run_migrations(&db).await.unwrap();

    let org_repo = SurrealOrganizationRepository::new(db.clone());
    for (id, name, health_system) in orgs {
        org_repo
            .create(CreateOrganization {
                id: *id,
                name: (*name).into(),
                health_system_name: health_system.map(Into::into),
            })
            .await
            .unwrap();
    }

    (org_repo, SurrealAffiliationRepository::new(db))
}

fn request(requester_id: i64, counterpart_id: i64) -> CreateAffiliation {
    CreateAffiliation {
        requester_id,
        counterpart_id,
    }
}

// -----------------------------------------------------------------------
// Organizations
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_organization() {
    let (org_repo, _) = setup(&[]).await;

    let org = org_repo
        .create(CreateOrganization {
            id: 42,
            name: "St. Mercy".into(),
            health_system_name: Some("Mercy Health".into()),
        })
        .await
        .unwrap();
    assert_eq!(org.id, 42);

    let fetched = org_repo.get_by_id(42).await.unwrap();
    assert_eq!(fetched.name, "St. Mercy");
    assert_eq!(fetched.health_system_name.as_deref(), Some("Mercy Health"));
}

#[tokio::test]
async fn duplicate_organization_id_is_rejected() {
    let (org_repo, _) = setup(&[(1, "One", None)]).await;

    let err = org_repo
        .create(CreateOrganization {
            id: 1,
            name: "Again".into(),
            health_system_name: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AffiliateError::ConstraintViolation(_)));
}

#[tokio::test]
async fn get_missing_organization_is_not_found() {
    let (org_repo, _) = setup(&[]).await;
    let err = org_repo.get_by_id(999).await.unwrap_err();
    assert!(matches!(err, AffiliateError::NotFound { .. }));
}

#[tokio::test]
async fn get_many_skips_unknown_ids() {
    let (org_repo, _) = setup(&[(1, "One", None), (2, "Two", None)]).await;
    let mut orgs = org_repo.get_many(&[1, 2, 3]).await.unwrap();
    orgs.sort_by_key(|o| o.id);
    assert_eq!(orgs.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);
}

// -----------------------------------------------------------------------
// Affiliations
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_affiliation_starts_as_active_request() {
    let (_, repo) = setup(&[(1, "One", None), (2, "Two", None)]).await;

    let affiliation = repo.create(request(1, 2)).await.unwrap();
    assert!(affiliation.id.is_some());
    assert_eq!(affiliation.requester_id, 1);
    assert_eq!(affiliation.counterpart_id, 2);
    assert_eq!(affiliation.status, AffiliationStatus::ActiveRequest);
    assert!(affiliation.active);

    let fetched = repo.get_by_id(affiliation.id.unwrap()).await.unwrap();
    assert_eq!(fetched, affiliation);
}

#[tokio::test]
async fn create_with_unknown_counterpart_is_invalid_affiliate_with() {
    let (_, repo) = setup(&[(1, "One", None)]).await;
    let err = repo.create(request(1, 99)).await.unwrap_err();
    assert!(matches!(err, AffiliateError::InvalidAffiliateWith(_)));
}

#[tokio::test]
async fn create_with_unknown_requester_is_constraint_violation() {
    let (_, repo) = setup(&[(2, "Two", None)]).await;
    let err = repo.create(request(99, 2)).await.unwrap_err();
    assert!(matches!(err, AffiliateError::ConstraintViolation(_)));
}

#[tokio::test]
async fn second_active_record_for_pair_is_rejected() {
    let (_, repo) = setup(&[(1, "One", None), (2, "Two", None)]).await;
    repo.create(request(1, 2)).await.unwrap();

    // Reversed direction is the same unordered pair.
    let err = repo.create(request(2, 1)).await.unwrap_err();
    assert!(matches!(err, AffiliateError::ConstraintViolation(_)));
}

#[tokio::test]
async fn find_active_pair_is_unordered() {
    let (_, repo) = setup(&[(1, "One", None), (2, "Two", None), (3, "Three", None)]).await;
    let created = repo.create(request(1, 2)).await.unwrap();

    let forward = repo.find_active_pair(1, 2).await.unwrap().unwrap();
    let backward = repo.find_active_pair(2, 1).await.unwrap().unwrap();
    assert_eq!(forward.id, created.id);
    assert_eq!(backward.id, created.id);

    assert!(repo.find_active_pair(1, 3).await.unwrap().is_none());
}

#[tokio::test]
async fn update_status_is_conditional_on_expected_status() {
    let (_, repo) = setup(&[(1, "One", None), (2, "Two", None)]).await;
    let id = repo.create(request(1, 2)).await.unwrap().id.unwrap();

    let changed = repo
        .update_status(
            id,
            AffiliationStatus::ActiveRequest,
            AffiliationStatus::Affiliated,
            true,
        )
        .await
        .unwrap();
    assert_eq!(changed, 1);

    // A stale writer still expecting ACTIVE_REQUEST loses.
    let stale = repo
        .update_status(
            id,
            AffiliationStatus::ActiveRequest,
            AffiliationStatus::Rejected,
            true,
        )
        .await
        .unwrap();
    assert_eq!(stale, 0);

    let fetched = repo.get_by_id(id).await.unwrap();
    assert_eq!(fetched.status, AffiliationStatus::Affiliated);
}

#[tokio::test]
async fn deactivation_frees_the_pair() {
    let (_, repo) = setup(&[(1, "One", None), (2, "Two", None)]).await;
    let id = repo.create(request(1, 2)).await.unwrap().id.unwrap();

    repo.update_status(
        id,
        AffiliationStatus::ActiveRequest,
        AffiliationStatus::Cancelled,
        true,
    )
    .await
    .unwrap();
    let removed = repo
        .update_status(
            id,
            AffiliationStatus::Cancelled,
            AffiliationStatus::Removed,
            false,
        )
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let old = repo.get_by_id(id).await.unwrap();
    assert_eq!(old.status, AffiliationStatus::Removed);
    assert!(!old.active);
    assert!(repo.find_active_pair(1, 2).await.unwrap().is_none());

    // Inactive records cannot be updated any further.
    let again = repo
        .update_status(
            id,
            AffiliationStatus::Removed,
            AffiliationStatus::Removed,
            false,
        )
        .await
        .unwrap();
    assert_eq!(again, 0);

    let fresh = repo.create(request(2, 1)).await.unwrap();
    assert_ne!(fresh.id, old.id);
}

#[tokio::test]
async fn query_page_filters_by_side_and_status() {
    let (_, repo) = setup(&[
        (1, "Home", None),
        (2, "Bravo", None),
        (3, "Alpha", None),
        (4, "Delta", None),
    ])
    .await;

    // 1 -> 2 active request, 3 -> 1 active request, 1 -> 4 affiliated.
    repo.create(request(1, 2)).await.unwrap();
    repo.create(request(3, 1)).await.unwrap();
    let id = repo.create(request(1, 4)).await.unwrap().id.unwrap();
    repo.update_status(
        id,
        AffiliationStatus::ActiveRequest,
        AffiliationStatus::Affiliated,
        true,
    )
    .await
    .unwrap();

    let requests = repo
        .query_page(
            AffiliationQuery::for_category(1, FilterType::ActiveRequests),
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(requests.total, 2);
    // Sorted by the other organization's name: Alpha (3), Bravo (2).
    let others: Vec<_> = requests.items.iter().map(|a| a.other_party(1)).collect();
    assert_eq!(others, vec![3, 2]);

    let affiliates = repo
        .query_page(
            AffiliationQuery::for_category(1, FilterType::Affiliates),
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(affiliates.total, 1);
    assert_eq!(affiliates.items[0].counterpart_id, 4);
}

#[tokio::test]
async fn query_page_searches_and_sorts_other_side() {
    let (_, repo) = setup(&[
        (1, "Home", Some("Home Health")),
        (2, "Mercy West", Some("Mercy")),
        (3, "Mercy East", Some("Mercy")),
        (4, "Valley", Some("Mercy Partners")),
        (5, "Unrelated", None),
    ])
    .await;

    for other in 2..=5 {
        repo.create(request(1, other)).await.unwrap();
    }

    let query = AffiliationQuery::for_category(1, FilterType::All)
        .with_search(Some("Mercy".into()))
        .sorted_by(SortColumn::Name, SortOrder::Desc);
    let page = repo.query_page(query, Pagination::default()).await.unwrap();

    // "Home" matches its own health system but is never the other side.
    let others: Vec<_> = page.items.iter().map(|a| a.counterpart_id).collect();
    assert_eq!(others, vec![4, 2, 3]);
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn query_page_paginates_after_filtering() {
    let (_, repo) = setup(&[
        (1, "Home", None),
        (2, "A", None),
        (3, "B", None),
        (4, "C", None),
    ])
    .await;
    for other in 2..=4 {
        repo.create(request(other, 1)).await.unwrap();
    }

    let page = repo
        .query_page(
            AffiliationQuery::for_category(1, FilterType::All),
            Pagination::page(1, 2),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].requester_id, 4);
}

#[tokio::test]
async fn query_page_excludes_inactive_records() {
    let (_, repo) = setup(&[(1, "One", None), (2, "Two", None)]).await;
    let id = repo.create(request(1, 2)).await.unwrap().id.unwrap();
    repo.update_status(
        id,
        AffiliationStatus::ActiveRequest,
        AffiliationStatus::Cancelled,
        true,
    )
    .await
    .unwrap();
    repo.update_status(
        id,
        AffiliationStatus::Cancelled,
        AffiliationStatus::Removed,
        false,
    )
    .await
    .unwrap();

    for filter_type in [
        FilterType::Unaffiliated,
        FilterType::Affiliates,
        FilterType::ActiveRequests,
        FilterType::All,
    ] {
        let page = repo
            .query_page(
                AffiliationQuery::for_category(1, filter_type),
                Pagination::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 0, "{filter_type:?} returned an inactive record");
    }
}

#[tokio::test]
async fn query_page_returns_one_page_with_full_count() {
    let (_, repo) = setup(&[
        (1, "Home", None),
        (2, "Delta", None),
        (3, "Alpha", None),
        (4, "Charlie", None),
        (5, "Bravo", None),
    ])
    .await;
    for other in 2..=5 {
        repo.create(request(1, other)).await.unwrap();
    }

    let first = repo
        .query_page(
            AffiliationQuery::for_category(1, FilterType::ActiveRequests),
            Pagination::page(0, 1),
        )
        .await
        .unwrap();
    assert_eq!(first.total, 4);
    assert_eq!(first.items.len(), 1);
    assert_eq!(first.items[0].counterpart_id, 3);
    assert_eq!(first.limit, 1);

    let third = repo
        .query_page(
            AffiliationQuery::for_category(1, FilterType::ActiveRequests),
            Pagination::page(2, 1),
        )
        .await
        .unwrap();
    assert_eq!(third.total, 4);
    assert_eq!(third.items[0].counterpart_id, 4);

    let past_end = repo
        .query_page(
            AffiliationQuery::for_category(1, FilterType::ActiveRequests),
            Pagination::page(4, 1),
        )
        .await
        .unwrap();
    assert_eq!(past_end.total, 4);
    assert!(past_end.items.is_empty());
}

#[tokio::test]
async fn health_system_sort_puts_missing_first_and_breaks_ties_by_id() {
    let (_, repo) = setup(&[
        (1, "Home", None),
        (2, "Two", Some("Prairie Care")),
        (3, "Three", None),
        (4, "Four", Some("Lakeshore")),
        (5, "Five", Some("Prairie Care")),
    ])
    .await;
    // Requested in reverse id order so creation order cannot decide ties.
    for other in (2..=5).rev() {
        repo.create(request(other, 1)).await.unwrap();
    }

    let query = AffiliationQuery::for_category(1, FilterType::All)
        .sorted_by(SortColumn::HealthSystemName, SortOrder::Asc);
    let page = repo.query_page(query, Pagination::default()).await.unwrap();

    let others: Vec<_> = page.items.iter().map(|a| a.requester_id).collect();
    assert_eq!(others, vec![3, 4, 2, 5]);
}

#[tokio::test]
async fn query_page_search_is_case_sensitive() {
    let (_, repo) = setup(&[
        (1, "Home", None),
        (2, "St. Mercy", None),
        (3, "st. mercy annex", None),
    ])
    .await;
    repo.create(request(1, 2)).await.unwrap();
    repo.create(request(1, 3)).await.unwrap();

    let query = AffiliationQuery::for_category(1, FilterType::All).with_search(Some("Mercy".into()));
    let page = repo.query_page(query, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].counterpart_id, 2);
}
