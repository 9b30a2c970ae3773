//! Cache key type for cached user representations.
use thiserror::Error;

const USER_KEY_PREFIX: &str = "user:";

/// Key under which a single user's representation is cached.
///
/// Keys are always `user:{id}`; [`UserCacheKey::PATTERN`] matches every one
/// of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserCacheKey(String);

impl UserCacheKey {
    /// Glob pattern matching every user key.
    pub const PATTERN: &'static str = "user:*";

    /// Key for the user with `id`.
    #[must_use]
    pub fn for_user(id: i64) -> Self {
        Self(format!("{USER_KEY_PREFIX}{id}"))
    }

    /// Parse a raw key read back from the cache.
    pub fn parse(raw: &str) -> Result<Self, UserCacheKeyValidationError> {
        let id = raw
            .strip_prefix(USER_KEY_PREFIX)
            .ok_or(UserCacheKeyValidationError::MissingPrefix)?;
        let id: i64 = id
            .parse()
            .map_err(|_| UserCacheKeyValidationError::InvalidId)?;
        Ok(Self::for_user(id))
    }

    /// Borrow the underlying key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for UserCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for UserCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned by [`UserCacheKey::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserCacheKeyValidationError {
    /// Key does not start with `user:`.
    #[error("user cache key must start with `user:`")]
    MissingPrefix,
    /// Suffix is not a numeric user id.
    #[error("user cache key must end with a numeric user id")]
    InvalidId,
}
