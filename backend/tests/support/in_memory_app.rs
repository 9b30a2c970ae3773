//! Shared builders for integration tests running the API over the in-memory
//! store.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use playground::Trace;
use playground::domain::ports::NoOpUserCache;
use playground::domain::user_service::DEFAULT_CACHE_TTL;
use playground::domain::{DeploymentMode, ThreadWorkerIdentity};
use playground::inbound::http::api_scope;
use playground::inbound::http::state::{HttpState, HttpStatePorts};
use playground::outbound::memory::InMemoryStore;

/// Handler state for `mode` over an empty in-memory store.
pub fn in_memory_state(mode: DeploymentMode) -> web::Data<HttpState> {
    let store = Arc::new(InMemoryStore::with_probe_wait(mode.wait_style()));
    web::Data::new(HttpState::new(
        mode,
        HttpStatePorts {
            users: store.clone(),
            posts: store.clone(),
            probe: store,
            cache: Arc::new(NoOpUserCache),
            identity: Arc::new(ThreadWorkerIdentity),
        },
        DEFAULT_CACHE_TTL,
    ))
}

/// The API as the server mounts it, sharing `state`.
pub fn api_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let mode = state.mode;
    App::new()
        .wrap(Trace)
        .app_data(state)
        .service(api_scope(mode))
}
