//! Delay and CPU benchmark use-cases.
//!
//! `GET /delay/{ms}` behaves differently per deployment: the blocking
//! deployment parks its worker for the whole wait, the non-blocking
//! deployment suspends the request and lets the worker serve others. The
//! anti-pattern variant blocks even in the non-blocking deployment, stalling
//! every request queued on the same event-loop worker.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::{DeploymentMode, Error, TraceId, WaitStyle, WorkerIdentity};

/// Longest accepted simulated delay.
pub const MAX_DELAY_MS: u64 = 60_000;
/// Largest accepted CPU iteration count.
pub const MAX_CPU_ITERATIONS: u64 = 10_000_000_000;

const BLOCKING_MESSAGE: &str = "Blocking delay completed";
const NON_BLOCKING_MESSAGE: &str = "Non-blocking delay completed";
const ANTI_PATTERN_MESSAGE: &str = "BLOCKING delay completed - THIS IS AN ANTI-PATTERN!";

/// Outcome of a simulated I/O wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DelayReport {
    /// Requested wait in milliseconds.
    #[schema(example = 1000)]
    pub requested_delay: u64,
    /// Measured wall-clock wait in milliseconds.
    #[schema(example = 1001)]
    pub actual_delay: u64,
    /// Worker that started the request.
    #[schema(example = "actix-rt|system:0|arbiter:3")]
    pub start_thread: String,
    /// Worker that finished the request.
    #[schema(example = "actix-rt|system:0|arbiter:3")]
    pub end_thread: String,
    /// Human-readable outcome.
    #[schema(example = "Non-blocking delay completed")]
    pub message: String,
}

/// Outcome of the CPU-bound sum of squares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CpuReport {
    /// Number of terms summed.
    #[schema(example = 1000)]
    pub iterations: u64,
    /// Wrapping 64-bit sum of `i * i` for `i` in `0..iterations`.
    #[schema(example = 332_833_500)]
    pub result: i64,
    /// Computation time in milliseconds.
    pub elapsed: u64,
    /// Worker that ran the computation.
    pub thread_name: String,
}

/// Validate a requested delay.
///
/// # Errors
/// Returns an invalid-request error for negative values or values above
/// [`MAX_DELAY_MS`].
pub fn validate_delay_ms(value: i64) -> Result<u64, Error> {
    u64::try_from(value)
        .ok()
        .filter(|ms| *ms <= MAX_DELAY_MS)
        .ok_or_else(|| {
            Error::invalid_request(format!(
                "delay must be between 0 and {MAX_DELAY_MS} milliseconds"
            ))
        })
}

/// Validate a requested iteration count.
///
/// # Errors
/// Returns an invalid-request error for negative values or values above
/// [`MAX_CPU_ITERATIONS`].
pub fn validate_iterations(value: i64) -> Result<u64, Error> {
    u64::try_from(value)
        .ok()
        .filter(|n| *n <= MAX_CPU_ITERATIONS)
        .ok_or_else(|| {
            Error::invalid_request(format!(
                "iterations must be between 0 and {MAX_CPU_ITERATIONS}"
            ))
        })
}

/// Sum `i * i` for `i` in `0..iterations` with two's-complement wrapping.
///
/// # Examples
/// ```
/// use playground::domain::sum_of_squares;
///
/// assert_eq!(sum_of_squares(0), 0);
/// assert_eq!(sum_of_squares(4), 14);
/// ```
#[must_use]
pub fn sum_of_squares(iterations: u64) -> i64 {
    let limit = i64::try_from(iterations).unwrap_or(i64::MAX);
    (0..limit).fold(0_i64, |acc, i| acc.wrapping_add(i.wrapping_mul(i)))
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Delay and CPU benchmarks bound to one deployment mode.
#[derive(Clone)]
pub struct BenchmarkService {
    mode: DeploymentMode,
    identity: Arc<dyn WorkerIdentity>,
}

impl BenchmarkService {
    /// Create a service for `mode`, naming workers through `identity`.
    pub fn new(mode: DeploymentMode, identity: Arc<dyn WorkerIdentity>) -> Self {
        Self { mode, identity }
    }

    /// Deployment mode the service waits in.
    #[must_use]
    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    /// Wait `ms` milliseconds in the deployment's natural style.
    pub async fn delay(&self, ms: u64) -> DelayReport {
        let message = match self.mode {
            DeploymentMode::Blocking => BLOCKING_MESSAGE,
            DeploymentMode::NonBlocking => NON_BLOCKING_MESSAGE,
        };
        self.timed_wait(self.mode.wait_style(), ms, message).await
    }

    /// Block the current worker for `ms` milliseconds regardless of mode.
    ///
    /// In the non-blocking deployment this stalls every request scheduled on
    /// the same worker; it exists to demonstrate that failure mode.
    pub async fn blocking_delay(&self, ms: u64) -> DelayReport {
        warn!(
            trace_id = %TraceId::current_label(),
            worker = %self.identity.current(),
            requested_ms = ms,
            "blocking the event loop on purpose"
        );
        self.timed_wait(WaitStyle::Block, ms, ANTI_PATTERN_MESSAGE)
            .await
    }

    async fn timed_wait(&self, style: WaitStyle, ms: u64, message: &str) -> DelayReport {
        let start_thread = self.identity.current();
        info!(
            trace_id = %TraceId::current_label(),
            worker = %start_thread,
            mode = %self.mode,
            requested_ms = ms,
            "delay started"
        );
        let started = Instant::now();
        style.wait(Duration::from_millis(ms)).await;
        let actual_delay = elapsed_millis(started);
        let end_thread = self.identity.current();
        info!(
            trace_id = %TraceId::current_label(),
            worker = %end_thread,
            actual_ms = actual_delay,
            "delay completed"
        );
        DelayReport {
            requested_delay: ms,
            actual_delay,
            start_thread,
            end_thread,
            message: message.to_owned(),
        }
    }

    /// Compute the sum of squares on the current worker without yielding.
    #[must_use]
    pub fn cpu(&self, iterations: u64) -> CpuReport {
        info!(
            trace_id = %TraceId::current_label(),
            worker = %self.identity.current(),
            iterations,
            "cpu task started"
        );
        let started = Instant::now();
        let result = sum_of_squares(iterations);
        let report = CpuReport {
            iterations,
            result,
            elapsed: elapsed_millis(started),
            thread_name: self.identity.current(),
        };
        info!(
            trace_id = %TraceId::current_label(),
            worker = %report.thread_name,
            iterations,
            elapsed_ms = report.elapsed,
            "cpu task completed"
        );
        report
    }
}
