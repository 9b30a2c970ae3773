//! Tests for the user service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockUserCache, MockUserStore, NoOpUserCache, UserCacheError};
use chrono::Utc;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

fn user(id: i64, email: &str, name: &str) -> User {
    let now = Utc::now();
    User {
        id,
        email: email.to_owned(),
        name: name.to_owned(),
        created_at: now,
        updated_at: now,
    }
}

fn make_service(store: MockUserStore) -> UserService {
    UserService::new(Arc::new(store), Arc::new(NoOpUserCache))
}

#[fixture]
fn ann() -> User {
    user(1, "ann@x.io", "Ann")
}

#[rstest]
#[tokio::test]
async fn create_rejects_duplicate_email() {
    let mut store = MockUserStore::new();
    store
        .expect_exists_by_email()
        .with(eq("ann@x.io"))
        .times(1)
        .return_once(|_| Ok(true));
    store.expect_insert().never();

    let service = make_service(store);
    let new_user = NewUser::try_new("ann@x.io", "Ann").expect("valid user");

    let error = service.create_user(new_user).await.expect_err("conflict");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Email already exists: ann@x.io");
}

#[rstest]
#[tokio::test]
async fn create_maps_racing_unique_violation_to_conflict() {
    let mut store = MockUserStore::new();
    store.expect_exists_by_email().return_once(|_| Ok(false));
    store
        .expect_insert()
        .return_once(|_| Err(StoreError::conflict("users_email_key")));

    let service = make_service(store);
    let new_user = NewUser::try_new("ann@x.io", "Ann").expect("valid user");

    let error = service.create_user(new_user).await.expect_err("conflict");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_returns_stored_user(ann: User) {
    let mut store = MockUserStore::new();
    store.expect_exists_by_email().return_once(|_| Ok(false));
    let stored = ann.clone();
    store.expect_insert().return_once(move |_| Ok(stored));

    let service = make_service(store);
    let created = service
        .create_user(NewUser::try_new("ann@x.io", "Ann").expect("valid user"))
        .await
        .expect("created");

    assert_eq!(created, ann);
}

#[rstest]
#[tokio::test]
async fn get_user_serves_cache_hit_without_store(ann: User) {
    let mut store = MockUserStore::new();
    store.expect_find_by_id().never();
    let mut cache = MockUserCache::new();
    let cached = ann.clone();
    cache
        .expect_get()
        .withf(|key| key.as_str() == "user:1")
        .return_once(move |_| Ok(Some(cached)));

    let service = UserService::new(Arc::new(store), Arc::new(cache));
    let found = service.get_user(1).await.expect("cached user");

    assert_eq!(found, ann);
}

#[rstest]
#[tokio::test]
async fn get_user_populates_cache_on_miss(ann: User) {
    let mut store = MockUserStore::new();
    let stored = ann.clone();
    store
        .expect_find_by_id()
        .with(eq(1))
        .return_once(move |_| Ok(Some(stored)));
    let mut cache = MockUserCache::new();
    cache.expect_get().return_once(|_| Ok(None));
    cache
        .expect_put()
        .withf(|key, user, ttl| {
            key.as_str() == "user:1"
                && user.id == 1
                && *ttl >= Duration::from_secs(60)
                && *ttl <= Duration::from_secs(66)
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let service = UserService::new(Arc::new(store), Arc::new(cache))
        .with_cache_ttl(Duration::from_secs(60));
    let found = service.get_user(1).await.expect("user");

    assert_eq!(found, ann);
}

#[rstest]
#[tokio::test]
async fn get_user_ignores_cache_failures(ann: User) {
    let mut store = MockUserStore::new();
    let stored = ann.clone();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    let mut cache = MockUserCache::new();
    cache
        .expect_get()
        .return_once(|_| Err(UserCacheError::backend("connection reset")));
    cache
        .expect_put()
        .return_once(|_, _, _| Err(UserCacheError::backend("connection reset")));

    let service = UserService::new(Arc::new(store), Arc::new(cache));
    assert_eq!(service.get_user(1).await.expect("user"), ann);
}

#[rstest]
#[tokio::test]
async fn get_user_reports_missing_user() {
    let mut store = MockUserStore::new();
    store.expect_find_by_id().return_once(|_| Ok(None));

    let error = make_service(store)
        .get_user(99)
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "User not found with id: 99");
}

#[rstest]
#[tokio::test]
async fn get_by_email_reports_missing_user() {
    let mut store = MockUserStore::new();
    store.expect_find_by_email().return_once(|_| Ok(None));

    let error = make_service(store)
        .get_user_by_email("nobody@x.io")
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_rejects_email_owned_by_another_user(ann: User) {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(ann)));
    store
        .expect_exists_by_email()
        .with(eq("bob@x.io"))
        .return_once(|_| Ok(true));
    store.expect_update().never();

    let changes = UserChanges::try_new(Some("bob@x.io".to_owned()), None).expect("valid");
    let error = make_service(store)
        .update_user(1, changes)
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_keeping_own_email_skips_uniqueness_check(ann: User) {
    let mut store = MockUserStore::new();
    let existing = ann.clone();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    store.expect_exists_by_email().never();
    let mut renamed = ann.clone();
    renamed.name = "Annie".to_owned();
    store
        .expect_update()
        .return_once(move |_, _| Ok(Some(renamed)));

    let changes = UserChanges::try_new(Some("ann@x.io".to_owned()), Some("Annie".to_owned()))
        .expect("valid");
    let updated = make_service(store)
        .update_user(1, changes)
        .await
        .expect("updated");

    assert_eq!(updated.name, "Annie");
    assert_eq!(updated.email, "ann@x.io");
}

#[rstest]
#[tokio::test]
async fn update_evicts_cached_user(ann: User) {
    let mut store = MockUserStore::new();
    let existing = ann.clone();
    store
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    store
        .expect_update()
        .return_once(move |_, _| Ok(Some(ann)));
    let mut cache = MockUserCache::new();
    cache
        .expect_evict()
        .withf(|key| key.as_str() == "user:1")
        .times(1)
        .return_once(|_| Err(UserCacheError::backend("timeout")));

    let service = UserService::new(Arc::new(store), Arc::new(cache));
    let changes = UserChanges::try_new(None, Some("Annie".to_owned())).expect("valid");

    assert!(service.update_user(1, changes).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn delete_reports_missing_user() {
    let mut store = MockUserStore::new();
    store.expect_delete().return_once(|_| Ok(false));

    let error = make_service(store)
        .delete_user(5)
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_evicts_cached_user() {
    let mut store = MockUserStore::new();
    store.expect_delete().with(eq(3)).return_once(|_| Ok(true));
    let mut cache = MockUserCache::new();
    cache
        .expect_evict()
        .withf(|key| key.as_str() == "user:3")
        .times(1)
        .return_once(|_| Ok(()));

    let service = UserService::new(Arc::new(store), Arc::new(cache));
    service.delete_user(3).await.expect("deleted");
}

#[rstest]
#[tokio::test]
async fn connection_failures_surface_as_unavailable() {
    let mut store = MockUserStore::new();
    store
        .expect_find_all()
        .return_once(|| Err(StoreError::connection("pool timed out")));

    let error = make_service(store)
        .list_users()
        .await
        .expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
fn jitter_stays_within_ten_percent() {
    let base = Duration::from_secs(100);
    for _ in 0..50 {
        let ttl = jittered_ttl(base);
        assert!(ttl >= base && ttl <= Duration::from_secs(110));
    }
}
