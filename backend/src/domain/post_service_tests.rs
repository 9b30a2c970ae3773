//! Tests for the post service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockPostStore, MockUserStore, StoreError};
use chrono::Utc;
use mockall::predicate::eq;
use rstest::rstest;

fn user(id: i64, name: &str) -> User {
    let now = Utc::now();
    User {
        id,
        email: format!("{}@x.io", name.to_lowercase()),
        name: name.to_owned(),
        created_at: now,
        updated_at: now,
    }
}

fn post(id: i64, user_id: i64, title: &str) -> Post {
    let now = Utc::now();
    Post {
        id,
        title: title.to_owned(),
        content: format!("content of {title}"),
        user_id,
        created_at: now,
        updated_at: now,
    }
}

fn make_service(posts: MockPostStore, users: MockUserStore) -> PostService {
    PostService::new(Arc::new(posts), Arc::new(users))
}

#[rstest]
#[tokio::test]
async fn create_requires_existing_owner() {
    let mut users = MockUserStore::new();
    users.expect_find_by_id().with(eq(42)).return_once(|_| Ok(None));
    let mut posts = MockPostStore::new();
    posts.expect_insert().never();

    let new_post = NewPost::try_new("Hello", "World", 42).expect("valid post");
    let error = make_service(posts, users)
        .create_post(new_post)
        .await
        .expect_err("owner missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "User not found with id: 42");
}

#[rstest]
#[tokio::test]
async fn create_reports_owner_deleted_before_insert() {
    let mut users = MockUserStore::new();
    users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(5, "Eve"))));
    let mut posts = MockPostStore::new();
    posts
        .expect_insert()
        .return_once(|_| Err(StoreError::missing_reference("posts_user_id_fkey")));

    let error = make_service(posts, users)
        .create_post(NewPost::try_new("Hello", "World", 5).expect("valid post"))
        .await
        .expect_err("owner vanished");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "User not found with id: 5");
}

#[rstest]
#[tokio::test]
async fn create_returns_author_name() {
    let mut users = MockUserStore::new();
    users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(1, "Ann"))));
    let mut posts = MockPostStore::new();
    posts
        .expect_insert()
        .withf(|new_post| new_post.title().as_str() == "Hello" && new_post.user_id() == 1)
        .return_once(|_| Ok(post(10, 1, "Hello")));

    let created = make_service(posts, users)
        .create_post(NewPost::try_new("Hello", "World", 1).expect("valid post"))
        .await
        .expect("created");

    assert_eq!(created.id, 10);
    assert_eq!(created.author_name, "Ann");
}

#[rstest]
#[tokio::test]
async fn get_reports_missing_post() {
    let mut posts = MockPostStore::new();
    posts.expect_find_by_id().return_once(|_| Ok(None));

    let error = make_service(posts, MockUserStore::new())
        .get_post(7)
        .await
        .expect_err("missing");

    assert_eq!(error.message(), "Post not found with id: 7");
}

#[rstest]
#[tokio::test]
async fn list_by_user_requires_existing_user() {
    let mut users = MockUserStore::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let mut posts = MockPostStore::new();
    posts.expect_find_by_user_id().never();

    let error = make_service(posts, users)
        .list_posts_by_user(3)
        .await
        .expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_by_user_allows_empty_result() {
    let mut users = MockUserStore::new();
    users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(3, "Cat"))));
    let mut posts = MockPostStore::new();
    posts.expect_find_by_user_id().return_once(|_| Ok(Vec::new()));

    let listed = make_service(posts, users)
        .list_posts_by_user(3)
        .await
        .expect("listed");

    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test]
async fn list_posts_preserves_order_with_concurrent_lookups() {
    let all: Vec<Post> = (1..=40).map(|id| post(id, id % 3 + 1, "t")).collect();
    let expected_ids: Vec<i64> = all.iter().map(|p| p.id).collect();
    let mut posts = MockPostStore::new();
    posts.expect_find_all().return_once(move || Ok(all));
    let mut users = MockUserStore::new();
    users
        .expect_find_by_id()
        .times(40)
        .returning(|id| Ok(Some(user(id, &format!("U{id}")))));

    let listed = make_service(posts, users)
        .list_posts()
        .await
        .expect("listed");

    let ids: Vec<i64> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, expected_ids);
    assert!(listed.iter().all(|p| p.author_name == format!("U{}", p.user_id)));
}

#[rstest]
#[tokio::test]
async fn batch_listing_fetches_distinct_authors_once() {
    let all = vec![post(1, 2, "a"), post(2, 1, "b"), post(3, 2, "c")];
    let mut posts = MockPostStore::new();
    posts.expect_find_all().return_once(move || Ok(all));
    let mut users = MockUserStore::new();
    users.expect_find_by_id().never();
    users
        .expect_find_by_ids()
        .withf(|ids| ids.to_vec() == vec![1, 2])
        .times(1)
        .return_once(|_| Ok(vec![user(1, "Ann"), user(2, "Bob")]));

    let listed = make_service(posts, users)
        .list_posts_batch()
        .await
        .expect("listed");

    let authors: Vec<&str> = listed.iter().map(|p| p.author_name.as_str()).collect();
    assert_eq!(authors, vec!["Bob", "Ann", "Bob"]);
}

#[rstest]
#[tokio::test]
async fn search_without_matches_skips_author_lookup() {
    let mut posts = MockPostStore::new();
    posts.expect_search().return_once(|_| Ok(Vec::new()));
    let mut users = MockUserStore::new();
    users.expect_find_by_ids().never();

    let condition = PostSearchCondition::new(Some("zzz".to_owned()), None, None);
    let found = make_service(posts, users)
        .search_posts(&condition)
        .await
        .expect("searched");

    assert!(found.is_empty());
}

#[rstest]
#[tokio::test]
async fn update_reports_missing_post() {
    let mut posts = MockPostStore::new();
    posts.expect_update().return_once(|_, _| Ok(None));

    let changes = PostChanges::try_new(Some("New".to_owned()), None).expect("valid");
    let error = make_service(posts, MockUserStore::new())
        .update_post(9, changes)
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_returns_author_name() {
    let mut posts = MockPostStore::new();
    posts
        .expect_update()
        .return_once(|_, _| Ok(Some(post(1, 1, "Hi"))));
    let mut users = MockUserStore::new();
    users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(1, "Ann"))));

    let changes = PostChanges::try_new(Some("Hi".to_owned()), None).expect("valid");
    let updated = make_service(posts, users)
        .update_post(1, changes)
        .await
        .expect("updated");

    assert_eq!(updated.title, "Hi");
    assert_eq!(updated.author_name, "Ann");
}

#[rstest]
#[tokio::test]
async fn delete_reports_missing_post() {
    let mut posts = MockPostStore::new();
    posts.expect_delete().return_once(|_| Ok(false));

    let error = make_service(posts, MockUserStore::new())
        .delete_post(4)
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
