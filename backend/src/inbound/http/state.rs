//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{DatastoreProbe, PostStore, UserCache, UserStore};
use crate::domain::{
    BenchmarkService, DeploymentMode, PerformanceService, PostService, UserService,
    WorkerIdentity,
};

/// Parameter object bundling the port implementations behind the services.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub probe: Arc<dyn DatastoreProbe>,
    pub cache: Arc<dyn UserCache>,
    pub identity: Arc<dyn WorkerIdentity>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub mode: DeploymentMode,
    pub users: UserService,
    pub posts: PostService,
    pub benchmark: BenchmarkService,
    pub performance: PerformanceService,
}

impl HttpState {
    /// Wire the services for `mode` over `ports`, caching users for
    /// `cache_ttl` plus jitter.
    pub fn new(mode: DeploymentMode, ports: HttpStatePorts, cache_ttl: Duration) -> Self {
        let HttpStatePorts {
            users,
            posts,
            probe,
            cache,
            identity,
        } = ports;
        Self {
            mode,
            users: UserService::new(users.clone(), cache).with_cache_ttl(cache_ttl),
            posts: PostService::new(posts.clone(), users),
            benchmark: BenchmarkService::new(mode, identity),
            performance: PerformanceService::new(probe, posts),
        }
    }
}
