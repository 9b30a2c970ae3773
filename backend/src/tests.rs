//! Tests for the server bootstrap, covering bind resolution, metrics
//! initialisation, and readiness signalling.

use super::{HealthState, ServerConfig, create_server, resolve_bind_addr};
#[cfg(feature = "metrics")]
use super::server::mode_metrics;
use actix_web::web;
use playground::domain::DeploymentMode;
use rstest::{fixture, rstest};
use std::net::SocketAddr;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new(DeploymentMode::NonBlocking))
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[rstest]
fn bind_address_resolves_ip_literals() {
    let addr = resolve_bind_addr("127.0.0.1", 9000).expect("resolves");
    assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
}

#[cfg(feature = "metrics")]
#[rstest]
#[case(DeploymentMode::Blocking)]
#[case(DeploymentMode::NonBlocking)]
fn mode_metrics_build(#[case] mode: DeploymentMode) {
    assert!(mode_metrics(mode).is_some());
}

#[rstest]
#[case(DeploymentMode::Blocking)]
#[case(DeploymentMode::NonBlocking)]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    bind_address: SocketAddr,
    #[case] mode: DeploymentMode,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let _server = create_server(
        health_state.clone(),
        ServerConfig::new(mode, bind_address).with_workers(1),
    )
    .expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}
