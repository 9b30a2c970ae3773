//! Port interface for the user representation cache.
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::User;

use super::{UserCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by the cache adapter.
    pub enum UserCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "user cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "user cache serialisation failed: {message}",
    }
}

/// Key-value cache of user representations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Read a cached user.
    async fn get(&self, key: &UserCacheKey) -> Result<Option<User>, UserCacheError>;

    /// Store a user for `ttl`.
    async fn put(&self, key: &UserCacheKey, user: &User, ttl: Duration)
    -> Result<(), UserCacheError>;

    /// Remove one entry. Removing an absent key succeeds.
    async fn evict(&self, key: &UserCacheKey) -> Result<(), UserCacheError>;

    /// Remove every user entry, returning how many were removed.
    async fn clear_all(&self) -> Result<u64, UserCacheError>;
}

/// Cache that stores nothing, used when no cache backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpUserCache;

#[async_trait]
impl UserCache for NoOpUserCache {
    async fn get(&self, _key: &UserCacheKey) -> Result<Option<User>, UserCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &UserCacheKey,
        _user: &User,
        _ttl: Duration,
    ) -> Result<(), UserCacheError> {
        Ok(())
    }

    async fn evict(&self, _key: &UserCacheKey) -> Result<(), UserCacheError> {
        Ok(())
    }

    async fn clear_all(&self) -> Result<u64, UserCacheError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn no_op_cache_always_misses() {
        let cache = NoOpUserCache;
        let key = UserCacheKey::for_user(1);

        assert!(cache.get(&key).await.expect("get succeeds").is_none());
        assert!(cache.evict(&key).await.is_ok());
        assert_eq!(cache.clear_all().await.expect("clear succeeds"), 0);
    }
}
