//! Port abstraction for user persistence.
//!
//! The blocking and suspending deployments share this capability set; only
//! the adapter behind it decides whether a call parks the worker thread or
//! yields it back to the event loop.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserChanges};

use super::StoreError;

/// Persistence operations over users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; the store assigns `id` and both timestamps.
    async fn insert(&self, user: &NewUser) -> Result<User, StoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Fetch a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Whether any user owns `email`.
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    /// All users ordered by identifier.
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    /// Users whose identifiers appear in `ids`, in one round trip.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError>;

    /// Apply `changes` and refresh `updated_at`; `None` when the user is gone.
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, StoreError>;

    /// Delete a user and its posts; `false` when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
