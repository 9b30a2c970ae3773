//! Port for holding a datastore connection busy for a fixed time.

use std::time::Duration;

use async_trait::async_trait;

use super::StoreError;

/// Issues a server-side sleep so load tests can observe pool saturation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatastoreProbe: Send + Sync {
    /// Keep one datastore connection busy for `duration`.
    async fn sleep(&self, duration: Duration) -> Result<(), StoreError>;
}
