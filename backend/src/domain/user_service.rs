//! User use-cases.
//!
//! Reads by id go through the user cache; writes evict the cached entry after
//! the store accepts them. Cache failures never fail a request: they are
//! logged and the store stays the source of truth.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::ports::{StoreError, UserCache, UserCacheKey, UserStore};
use crate::domain::{Error, NewUser, User, UserChanges};

/// Base lifetime of a cached user.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);
/// Upper bound of the random extension added to each TTL, in percent.
const TTL_JITTER_PERCENT: u128 = 10;

fn user_not_found(id: i64) -> Error {
    Error::not_found(format!("User not found with id: {id}"))
}

fn email_taken(email: &str) -> Error {
    Error::conflict(format!("Email already exists: {email}"))
}

/// Spread expiries so entries written together do not expire together.
fn jittered_ttl(base: Duration) -> Duration {
    let max_extra = u64::try_from(base.as_millis() * TTL_JITTER_PERCENT / 100).unwrap_or(0);
    let extra = rand::thread_rng().gen_range(0..=max_extra);
    base + Duration::from_millis(extra)
}

/// User service over a [`UserStore`] and a [`UserCache`].
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    cache: Arc<dyn UserCache>,
    cache_ttl: Duration,
}

impl UserService {
    /// Create a service with the default cache TTL.
    pub fn new(users: Arc<dyn UserStore>, cache: Arc<dyn UserCache>) -> Self {
        Self {
            users,
            cache,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the base cache TTL.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Create a user with a unique email.
    ///
    /// # Errors
    /// Conflict when the email is taken; store failures otherwise.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, Error> {
        let email = new_user.email().as_str();
        if self.users.exists_by_email(email).await? {
            return Err(email_taken(email));
        }
        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(|err| match err {
                StoreError::Conflict { .. } => email_taken(email),
                other => other.into(),
            })?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Fetch a user, serving from the cache when possible.
    ///
    /// # Errors
    /// Not found when no user has `id`.
    pub async fn get_user(&self, id: i64) -> Result<User, Error> {
        let key = UserCacheKey::for_user(id);
        match self.cache.get(&key).await {
            Ok(Some(user)) => {
                debug!(user_id = id, "user cache hit");
                return Ok(user);
            }
            Ok(None) => debug!(user_id = id, "user cache miss"),
            Err(error) => warn!(%error, user_id = id, "user cache read failed"),
        }

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        if let Err(error) = self.cache.put(&key, &user, jittered_ttl(self.cache_ttl)).await {
            warn!(%error, user_id = id, "user cache write failed");
        }
        Ok(user)
    }

    /// Fetch a user by exact email.
    ///
    /// # Errors
    /// Not found when no user owns `email`.
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, Error> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| Error::not_found(format!("User not found with email: {email}")))
    }

    /// All users ordered by id.
    ///
    /// # Errors
    /// Store failures only.
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.find_all().await?)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    /// Not found when the user is absent; conflict when the new email belongs
    /// to another user.
    pub async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        if let Some(email) = changes.email() {
            let email = email.as_str();
            if email != existing.email && self.users.exists_by_email(email).await? {
                return Err(email_taken(email));
            }
        }

        let updated = self
            .users
            .update(id, &changes)
            .await
            .map_err(|err| match (err, changes.email()) {
                (StoreError::Conflict { .. }, Some(email)) => email_taken(email.as_str()),
                (other, _) => other.into(),
            })?
            .ok_or_else(|| user_not_found(id))?;
        self.evict_cached(id).await;
        info!(user_id = id, "user updated");
        Ok(updated)
    }

    /// Delete a user together with its posts.
    ///
    /// # Errors
    /// Not found when the user is absent.
    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        if !self.users.delete(id).await? {
            return Err(user_not_found(id));
        }
        self.evict_cached(id).await;
        info!(user_id = id, "user deleted");
        Ok(())
    }

    /// Drop one cached user. Failures are logged and ignored.
    pub async fn evict_cached(&self, id: i64) {
        let key = UserCacheKey::for_user(id);
        if let Err(error) = self.cache.evict(&key).await {
            warn!(%error, key = %key, "user cache eviction failed");
        }
    }

    /// Drop every cached user. Failures are logged and ignored.
    pub async fn clear_cached(&self) {
        match self.cache.clear_all().await {
            Ok(removed) => info!(removed, "user cache cleared"),
            Err(error) => warn!(%error, "user cache clear failed"),
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
