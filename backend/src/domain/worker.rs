//! Execution-model primitives shared by both deployments.
//!
//! The blocking deployment parks its worker thread for every wait; the
//! non-blocking deployment suspends the request task and frees the worker for
//! other requests. [`WaitStyle`] captures that difference and
//! [`WorkerIdentity`] names whichever execution context is running a request.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which request-handling model a server process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentMode {
    /// Thread-per-request: a large worker pool, every wait blocks its worker.
    Blocking,
    /// Event loop: a few workers, waits suspend the request task.
    NonBlocking,
}

impl DeploymentMode {
    /// How handlers in this deployment wait for simulated I/O.
    #[must_use]
    pub const fn wait_style(self) -> WaitStyle {
        match self {
            Self::Blocking => WaitStyle::Block,
            Self::NonBlocking => WaitStyle::Suspend,
        }
    }

    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocking => "blocking",
            Self::NonBlocking => "non-blocking",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown deployment mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown deployment mode `{0}`; expected `blocking` or `non-blocking`")]
pub struct UnknownDeploymentMode(pub String);

impl FromStr for DeploymentMode {
    type Err = UnknownDeploymentMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocking" => Ok(Self::Blocking),
            "non-blocking" | "nonblocking" | "non_blocking" => Ok(Self::NonBlocking),
            other => Err(UnknownDeploymentMode(other.to_owned())),
        }
    }
}

/// How a handler waits for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStyle {
    /// Await a timer; the worker serves other tasks meanwhile.
    Suspend,
    /// Sleep the OS thread; nothing else runs on this worker meanwhile.
    Block,
}

impl WaitStyle {
    /// Wait for `duration` in this style.
    pub async fn wait(self, duration: Duration) {
        match self {
            Self::Suspend => tokio::time::sleep(duration).await,
            Self::Block => std::thread::sleep(duration),
        }
    }
}

/// Names the execution context currently running a request.
///
/// Threads are the context for both actix deployments; other concurrency
/// models can report their own task identifier.
pub trait WorkerIdentity: Send + Sync {
    /// Identifier of the current execution context.
    fn current(&self) -> String;
}

/// Reports the current OS thread's name, or its id when unnamed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadWorkerIdentity;

impl WorkerIdentity for ThreadWorkerIdentity {
    fn current(&self) -> String {
        let thread = std::thread::current();
        thread
            .name()
            .map_or_else(|| format!("{:?}", thread.id()), str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Instant;

    #[rstest]
    #[case("blocking", DeploymentMode::Blocking)]
    #[case("Non-Blocking", DeploymentMode::NonBlocking)]
    #[case("non_blocking", DeploymentMode::NonBlocking)]
    #[case(" blocking ", DeploymentMode::Blocking)]
    fn parses_mode_labels(#[case] raw: &str, #[case] expected: DeploymentMode) {
        assert_eq!(raw.parse::<DeploymentMode>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_mode() {
        let err = "reactive".parse::<DeploymentMode>().expect_err("unknown mode");
        assert_eq!(err, UnknownDeploymentMode("reactive".to_owned()));
    }

    #[rstest]
    fn modes_pick_matching_wait_style() {
        assert_eq!(DeploymentMode::Blocking.wait_style(), WaitStyle::Block);
        assert_eq!(DeploymentMode::NonBlocking.wait_style(), WaitStyle::Suspend);
    }

    #[rstest]
    fn thread_identity_uses_thread_name() {
        let name = std::thread::Builder::new()
            .name("worker-7".to_owned())
            .spawn(|| ThreadWorkerIdentity.current())
            .expect("spawn thread")
            .join()
            .expect("join thread");
        assert_eq!(name, "worker-7");
    }

    #[rstest]
    #[tokio::test]
    async fn both_styles_wait_at_least_the_duration() {
        for style in [WaitStyle::Block, WaitStyle::Suspend] {
            let started = Instant::now();
            style.wait(Duration::from_millis(20)).await;
            assert!(started.elapsed() >= Duration::from_millis(20));
        }
    }
}
