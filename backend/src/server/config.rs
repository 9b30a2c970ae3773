//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use playground::domain::DeploymentMode;
use playground::domain::user_service::DEFAULT_CACHE_TTL;
use playground::outbound::cache::RedisUserCache;
use playground::outbound::persistence::{BlockingDbPool, DbPool};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Datastore backing the store ports.
#[derive(Clone)]
pub enum Datastore {
    /// PostgreSQL through diesel-async; store calls suspend.
    Async(DbPool),
    /// PostgreSQL through synchronous Diesel; store calls block the worker.
    Blocking(BlockingDbPool),
    /// Process-local store used when no database is configured.
    InMemory,
}

impl Datastore {
    /// Stable label for logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Async(_) => "postgres-async",
            Self::Blocking(_) => "postgres-blocking",
            Self::InMemory => "in-memory",
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) mode: DeploymentMode,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) workers: Option<usize>,
    pub(crate) cache_ttl: Duration,
    pub(crate) datastore: Datastore,
    pub(crate) user_cache: Option<RedisUserCache>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration for `mode` over the in-memory store.
    #[must_use]
    pub fn new(mode: DeploymentMode, bind_addr: SocketAddr) -> Self {
        Self {
            mode,
            bind_addr,
            workers: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            datastore: Datastore::InMemory,
            user_cache: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Set the number of Actix worker threads.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the base lifetime of cached users.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Back the store ports with `datastore`.
    #[must_use]
    pub fn with_datastore(mut self, datastore: Datastore) -> Self {
        self.datastore = datastore;
        self
    }

    /// Cache users by id in Redis.
    #[must_use]
    pub fn with_user_cache(mut self, cache: RedisUserCache) -> Self {
        self.user_cache = Some(cache);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
