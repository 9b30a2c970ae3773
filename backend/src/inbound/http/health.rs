//! Health endpoints: liveness and readiness probes for orchestrators and the
//! load-comparison tool.
//!
//! Both probes answer with `Cache-Control: no-store` and a small JSON body
//! naming the deployment mode, so a load test can confirm which deployment
//! it is talking to before sending traffic.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};

use crate::domain::DeploymentMode;

/// Body of both probe responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProbeStatus {
    /// `UP` when the probe passes, `DOWN` otherwise.
    #[schema(example = "UP")]
    pub status: String,
    /// Deployment mode of the answering process.
    #[schema(example = "non-blocking")]
    pub mode: String,
}

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    mode: DeploymentMode,
    ready: AtomicBool,
    live: AtomicBool,
}

impl HealthState {
    /// Create a state for `mode` that is live but not yet ready.
    pub fn new(mode: DeploymentMode) -> Self {
        Self {
            mode,
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }

    /// Mark the service as ready once the server is bound.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(&self, probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(ProbeStatus {
                status: if probe_ok { "UP" } else { "DOWN" }.to_owned(),
                mode: self.mode.as_str().to_owned(),
            })
    }
}

/// Readiness probe: 200 once the server is bound, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = ProbeStatus),
        (status = 503, description = "Server is not ready", body = ProbeStatus)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_ready())
}

/// Liveness probe: 200 until the process is marked unhealthy.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive", body = ProbeStatus),
        (status = 503, description = "Server is shutting down", body = ProbeStatus)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_alive())
}
