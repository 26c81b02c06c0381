//! Integration tests for the generic document repository.
//!
//! These tests require a running MongoDB instance and are ignored by
//! default. Point `KANRI_TEST_MONGO_URI` at a disposable database and
//! run with `cargo test -- --ignored`.

use std::collections::HashSet;
use std::sync::Arc;

use bson::doc;
use chrono::{Duration as ChronoDuration, Utc};

use kanri_cache::CacheManager;
use kanri_cache::memory::MemoryCacheProvider;
use kanri_core::config::cache::{CacheConfig, MemoryCacheConfig};
use kanri_core::config::database::DatabaseConfig;
use kanri_core::traits::cache::CacheProvider;
use kanri_core::types::id::TenantId;
use kanri_core::types::pagination::PageRequest;
use kanri_core::types::stamp::EntityStamp;
use kanri_database::{DocumentRepository, MongoDatabase};
use kanri_entity::AdminUser;

fn cache_config() -> CacheConfig {
    CacheConfig::default()
}

fn memory_cache() -> CacheManager {
    let provider = MemoryCacheProvider::new(
        &MemoryCacheConfig {
            max_capacity: 10_000,
            time_to_live_seconds: 300,
        },
        300,
    );
    CacheManager::from_provider(Arc::new(provider))
}

async fn connect() -> MongoDatabase {
    let url = std::env::var("KANRI_TEST_MONGO_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let config = DatabaseConfig {
        url,
        database: "kanri_test".to_string(),
        server_selection_timeout_ms: 3000,
        connect_timeout_ms: 3000,
        max_pool_size: 5,
    };
    MongoDatabase::connect(&config)
        .await
        .expect("Failed to connect to test MongoDB")
}

async fn make_repo(db: &MongoDatabase, cache: &CacheManager) -> DocumentRepository<AdminUser> {
    DocumentRepository::<AdminUser>::new(db, cache.clone(), &cache_config())
        .await
        .expect("Failed to build repository")
}

async fn clean(db: &MongoDatabase) {
    db.collection::<bson::Document>("admin_users")
        .delete_many(doc! {})
        .await
        .expect("Failed to clean collection");
}

fn user_under(tenant: TenantId, username: &str) -> AdminUser {
    let mut user = AdminUser::new(username, "hash");
    user.stamp = EntityStamp::new(Some(tenant));
    user
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_tenant_isolation_on_reads() {
    let db = connect().await;
    clean(&db).await;
    let cache = memory_cache();
    let repo = make_repo(&db, &cache).await;

    let tenant = TenantId::new();
    let other = TenantId::new();

    let created = repo
        .insert(user_under(tenant, "isolated"))
        .await
        .expect("insert failed");
    let id = created.id.unwrap();

    let same = repo.find_by_id(id, Some(&tenant)).await.unwrap();
    assert_eq!(same.unwrap().username, "isolated");

    let cross = repo.find_by_id(id, Some(&other)).await.unwrap();
    assert!(cross.is_none(), "cross-tenant read must return nothing");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_logical_delete_is_idempotent_and_keeps_the_record() {
    let db = connect().await;
    clean(&db).await;
    let cache = memory_cache();
    let repo = make_repo(&db, &cache).await;

    let tenant = TenantId::new();
    let created = repo
        .insert(user_under(tenant, "doomed"))
        .await
        .expect("insert failed");
    let id = created.id.unwrap();

    assert!(repo.soft_delete(id).await.unwrap());
    assert!(repo.soft_delete(id).await.unwrap());

    // Gone from reads, still present in the store.
    assert!(repo.find_by_id(id, Some(&tenant)).await.unwrap().is_none());
    let raw = db
        .collection::<bson::Document>("admin_users")
        .find_one(doc! { "_id": id })
        .await
        .unwrap()
        .expect("record must survive logical delete");
    assert!(
        raw.get_document("stamp")
            .unwrap()
            .get_bool("is_deleted")
            .unwrap()
    );
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_partial_update_preserves_cleared_fields() {
    let db = connect().await;
    clean(&db).await;
    let cache = memory_cache();
    let repo = make_repo(&db, &cache).await;

    let tenant = TenantId::new();
    let mut user = user_under(tenant, "partial");
    user.display_name = "A".to_string();
    user.remark = "B".to_string();
    let created = repo.insert(user).await.expect("insert failed");
    let id = created.id.unwrap();

    let mut changed = created.clone();
    changed.display_name = "C".to_string();
    changed.remark = String::new();
    assert!(repo.update(&changed).await.unwrap());

    let stored = repo
        .find_by_id(id, Some(&tenant))
        .await
        .unwrap()
        .expect("user must still exist");
    assert_eq!(stored.display_name, "C");
    assert_eq!(stored.remark, "B", "cleared field must keep stored value");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_cache_coherence_after_update() {
    let db = connect().await;
    clean(&db).await;
    let cache = memory_cache();
    let repo = make_repo(&db, &cache).await;

    let tenant = TenantId::new();
    let created = repo
        .insert(user_under(tenant, "coherent"))
        .await
        .expect("insert failed");
    let id = created.id.unwrap();

    // Warm the single-entity cache.
    repo.find_by_id(id, Some(&tenant)).await.unwrap();

    let mut changed = created.clone();
    changed.display_name = "Fresh".to_string();
    assert!(repo.update(&changed).await.unwrap());

    let read_back = repo
        .find_by_id(id, Some(&tenant))
        .await
        .unwrap()
        .expect("user must exist");
    assert_eq!(read_back.display_name, "Fresh", "stale read after update");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_sequential_and_cold_jump_pagination() {
    let db = connect().await;
    clean(&db).await;
    let cache = memory_cache();
    let repo = make_repo(&db, &cache).await;

    let tenant = TenantId::new();
    let base = Utc::now();
    for i in 0..25 {
        let mut user = user_under(tenant, &format!("user{i:02}"));
        user.stamp.create_time = base + ChronoDuration::seconds(i);
        user.stamp.update_time = user.stamp.create_time;
        repo.insert(user).await.expect("insert failed");
    }

    let sort = DocumentRepository::<AdminUser>::default_sort();
    let mut seen = HashSet::new();
    let mut sizes = Vec::new();
    for page_number in 1..=3u64 {
        let page = repo
            .find_page(
                &PageRequest::new(page_number, 10),
                None,
                Some(&tenant),
                &sort,
            )
            .await
            .expect("page fetch failed");
        assert_eq!(page.total_items, 25);
        sizes.push(page.items.len());
        for item in &page.items {
            assert!(
                seen.insert(item.username.clone()),
                "duplicate row across pages: {}",
                item.username
            );
        }
    }
    assert_eq!(sizes, vec![10, 10, 5]);
    assert_eq!(seen.len(), 25);

    let expected_tail: Vec<String> = (20..25).map(|i| format!("user{i:02}")).collect();

    // Cursor eviction between fetches: page 3 must still be correct
    // via the skip/limit fallback.
    cache.flush_all().await.unwrap();
    let cold = repo
        .find_page(&PageRequest::new(3, 10), None, Some(&tenant), &sort)
        .await
        .expect("cold page fetch failed");
    let cold_names: Vec<String> = cold.items.iter().map(|u| u.username.clone()).collect();
    assert_eq!(cold_names, expected_tail);
}
