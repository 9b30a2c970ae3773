//! Cache adapters implementing the [`UserCache`](crate::domain::ports::UserCache) port.
//!
//! [`RedisUserCache`] stores users as JSON strings under `user:{id}` keys.
//! Without a configured Redis URL the server uses
//! [`NoOpUserCache`](crate::domain::ports::NoOpUserCache) instead.

mod redis_user_cache;

pub use redis_user_cache::RedisUserCache;
