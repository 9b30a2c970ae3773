//! Redis-backed user cache using `bb8-redis` connection pooling.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{self, PooledConnection};
use bb8_redis::redis::{self, AsyncCommands};
use tracing::debug;

use crate::domain::User;
use crate::domain::ports::{UserCache, UserCacheError, UserCacheKey};

/// Keys requested per `SCAN` round trip when clearing.
const SCAN_BATCH: usize = 100;

/// Redis implementation of the user cache.
#[derive(Clone)]
pub struct RedisUserCache {
    pool: bb8::Pool<RedisConnectionManager>,
}

impl RedisUserCache {
    /// Connect a pool of at most `max_size` connections to `redis_url`.
    ///
    /// # Errors
    ///
    /// `UserCacheError::Backend` when the URL is invalid or the initial
    /// connection fails.
    pub async fn connect(redis_url: &str, max_size: u32) -> Result<Self, UserCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| UserCacheError::backend(err.to_string()))?;
        let pool = bb8::Pool::builder()
            .max_size(max_size)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)
            .await
            .map_err(|err| UserCacheError::backend(err.to_string()))?;
        Ok(Self { pool })
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, UserCacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| UserCacheError::backend(err.to_string()))
    }
}

fn backend_error(error: redis::RedisError) -> UserCacheError {
    UserCacheError::backend(error.to_string())
}

/// Redis expiries are whole seconds; never round down to zero.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, key: &UserCacheKey) -> Result<Option<User>, UserCacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(key.as_str()).await.map_err(backend_error)?;
        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|err| UserCacheError::serialization(err.to_string()))
        })
        .transpose()
    }

    async fn put(
        &self,
        key: &UserCacheKey,
        user: &User,
        ttl: Duration,
    ) -> Result<(), UserCacheError> {
        let json = serde_json::to_string(user)
            .map_err(|err| UserCacheError::serialization(err.to_string()))?;
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(key.as_str(), json, ttl_seconds(ttl))
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn evict(&self, key: &UserCacheKey) -> Result<(), UserCacheError> {
        let mut conn = self.connection().await?;
        let _: u64 = conn.del(key.as_str()).await.map_err(backend_error)?;
        Ok(())
    }

    async fn clear_all(&self) -> Result<u64, UserCacheError> {
        let mut conn = self.connection().await?;
        let mut cursor: u64 = 0;
        let mut removed = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(UserCacheKey::PATTERN)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await
                .map_err(backend_error)?;
            if !keys.is_empty() {
                let deleted: u64 = conn.del(&keys).await.map_err(backend_error)?;
                removed += deleted;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!(removed, "user cache keys removed");
        Ok(removed)
    }
}
