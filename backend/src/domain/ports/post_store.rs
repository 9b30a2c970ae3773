//! Port abstraction for post persistence.

use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostSearchCondition};

use super::StoreError;

/// Persistence operations over posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post; the store assigns `id` and both timestamps.
    async fn insert(&self, post: &NewPost) -> Result<Post, StoreError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError>;

    /// All posts ordered by identifier.
    async fn find_all(&self) -> Result<Vec<Post>, StoreError>;

    /// Posts owned by `user_id`, ordered by identifier.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, StoreError>;

    /// Posts satisfying every filter of `condition`, ordered by identifier.
    async fn search(&self, condition: &PostSearchCondition) -> Result<Vec<Post>, StoreError>;

    /// The first `limit` posts by identifier.
    async fn find_page(&self, limit: i64) -> Result<Vec<Post>, StoreError>;

    /// Apply `changes` and refresh `updated_at`; `None` when the post is gone.
    async fn update(&self, id: i64, changes: &PostChanges) -> Result<Option<Post>, StoreError>;

    /// Delete a post; `false` when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
