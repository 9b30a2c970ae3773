//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::NoOpUserCache;
use crate::domain::user_service::DEFAULT_CACHE_TTL;
use crate::domain::{DeploymentMode, ThreadWorkerIdentity};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::Trace;
use crate::outbound::memory::InMemoryStore;

/// Handler state over a fresh in-memory store and no cache.
pub fn in_memory_state(mode: DeploymentMode) -> HttpState {
    let store = Arc::new(InMemoryStore::with_probe_wait(mode.wait_style()));
    HttpState::new(
        mode,
        HttpStatePorts {
            users: store.clone(),
            posts: store.clone(),
            probe: store,
            cache: Arc::new(NoOpUserCache),
            identity: Arc::new(ThreadWorkerIdentity),
        },
        DEFAULT_CACHE_TTL,
    )
}

/// The full API for `state.mode`, wrapped in the tracing middleware.
pub fn test_app(
    state: HttpState,
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
        .app_data(web::Data::new(state))
        .service(api_scope(mode))
}
