//! Builders wiring store and cache adapters into the HTTP state.

use std::sync::Arc;

use playground::domain::ThreadWorkerIdentity;
use playground::domain::ports::{DatastoreProbe, NoOpUserCache, PostStore, UserCache, UserStore};
use playground::inbound::http::state::{HttpState, HttpStatePorts};
use playground::outbound::memory::InMemoryStore;
use playground::outbound::persistence::{BlockingDieselStore, DieselStore};

use super::{Datastore, ServerConfig};

/// Share one adapter value across every store port.
fn ports_over<S>(store: S, cache: Arc<dyn UserCache>) -> HttpStatePorts
where
    S: UserStore + PostStore + DatastoreProbe + 'static,
{
    let store = Arc::new(store);
    HttpStatePorts {
        users: store.clone(),
        posts: store.clone(),
        probe: store,
        cache,
        identity: Arc::new(ThreadWorkerIdentity),
    }
}

fn build_ports(config: &ServerConfig) -> HttpStatePorts {
    let cache: Arc<dyn UserCache> = match &config.user_cache {
        Some(cache) => Arc::new(cache.clone()),
        None => Arc::new(NoOpUserCache),
    };
    match &config.datastore {
        Datastore::Async(pool) => ports_over(DieselStore::new(pool.clone()), cache),
        Datastore::Blocking(pool) => ports_over(BlockingDieselStore::new(pool.clone()), cache),
        Datastore::InMemory => ports_over(
            InMemoryStore::with_probe_wait(config.mode.wait_style()),
            cache,
        ),
    }
}

/// Build the handler state for `config`.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    HttpState::new(config.mode, build_ports(config), config.cache_ttl)
}
