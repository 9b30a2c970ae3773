//! Datastore load probes used when comparing the two deployments.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::domain::ports::{DatastoreProbe, PostStore};
use crate::domain::{Error, Post};

/// How long [`PerformanceService::datastore_sleep`] holds a connection.
pub const PROBE_SLEEP: Duration = Duration::from_secs(1);
/// Row cap for [`PerformanceService::bulk_posts`].
pub const BULK_LIMIT: i64 = 1000;

/// Probes that stress the datastore rather than the web tier.
#[derive(Clone)]
pub struct PerformanceService {
    probe: Arc<dyn DatastoreProbe>,
    posts: Arc<dyn PostStore>,
}

impl PerformanceService {
    /// Create a new service.
    pub fn new(probe: Arc<dyn DatastoreProbe>, posts: Arc<dyn PostStore>) -> Self {
        Self { probe, posts }
    }

    /// Hold one datastore connection for [`PROBE_SLEEP`].
    ///
    /// # Errors
    /// Store failures only.
    pub async fn datastore_sleep(&self) -> Result<(), Error> {
        self.probe.sleep(PROBE_SLEEP).await?;
        info!(seconds = PROBE_SLEEP.as_secs(), "datastore sleep completed");
        Ok(())
    }

    /// Read up to [`BULK_LIMIT`] posts without author resolution.
    ///
    /// # Errors
    /// Store failures only.
    pub async fn bulk_posts(&self) -> Result<Vec<Post>, Error> {
        Ok(self.posts.find_page(BULK_LIMIT).await?)
    }
}
