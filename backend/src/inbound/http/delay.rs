//! Delay and CPU benchmark handlers.
//!
//! ```text
//! GET /api/v1/delay/{ms}
//! GET /api/v1/delay/cpu/{iterations}
//! GET /api/v1/delay/blocking/{ms}   non-blocking deployment only
//! ```
//!
//! Parameters are extracted as signed integers so negative values reach
//! domain validation and get a descriptive 400.

use actix_web::{get, web};

use crate::domain::{CpuReport, DelayReport, validate_delay_ms, validate_iterations};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Wait `ms` milliseconds in the deployment's wait style.
#[utoipa::path(
    get,
    path = "/api/v1/delay/{ms}",
    params(("ms" = i64, Path, description = "Delay in milliseconds, 0 to 60000")),
    responses(
        (status = 200, description = "Delay completed", body = DelayReport),
        (status = 400, description = "Invalid delay", body = ErrorEnvelope)
    ),
    tags = ["benchmark"],
    operation_id = "delay"
)]
#[get("/delay/{ms}")]
pub async fn delay(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DelayReport>> {
    let ms = validate_delay_ms(path.into_inner())?;
    Ok(web::Json(state.benchmark.delay(ms).await))
}

/// Sum squares below `iterations` on the current worker.
#[utoipa::path(
    get,
    path = "/api/v1/delay/cpu/{iterations}",
    params(("iterations" = i64, Path, description = "Loop length, 0 to 10^10")),
    responses(
        (status = 200, description = "Computation finished", body = CpuReport),
        (status = 400, description = "Invalid iteration count", body = ErrorEnvelope)
    ),
    tags = ["benchmark"],
    operation_id = "cpuDelay"
)]
#[get("/delay/cpu/{iterations}")]
pub async fn cpu_delay(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CpuReport>> {
    let iterations = validate_iterations(path.into_inner())?;
    Ok(web::Json(state.benchmark.cpu(iterations)))
}

/// Block the event-loop worker for `ms` milliseconds.
///
/// Registered only in the non-blocking deployment, where it shows how one
/// blocking call stalls every request sharing the worker.
#[utoipa::path(
    get,
    path = "/api/v1/delay/blocking/{ms}",
    params(("ms" = i64, Path, description = "Delay in milliseconds, 0 to 60000")),
    responses(
        (status = 200, description = "Delay completed", body = DelayReport),
        (status = 400, description = "Invalid delay", body = ErrorEnvelope),
        (status = 404, description = "Not available in the blocking deployment")
    ),
    tags = ["benchmark"],
    operation_id = "blockingDelay"
)]
#[get("/delay/blocking/{ms}")]
pub async fn blocking_delay(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DelayReport>> {
    let ms = validate_delay_ms(path.into_inner())?;
    Ok(web::Json(state.benchmark.blocking_delay(ms).await))
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
