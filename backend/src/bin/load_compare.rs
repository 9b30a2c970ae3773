//! Fire the same delay workload at both deployments and compare latencies.
//!
//! ```text
//! load-compare --blocking-url http://localhost:8080 \
//!              --non-blocking-url http://localhost:8081 \
//!              --delay-ms 1000 --requests 400 --concurrency 200
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use futures_util::{StreamExt, stream};
use reqwest::{Client, Url};
use tokio::runtime::Builder;

/// `load-compare` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-compare",
    about = "Compare delay-endpoint latency between the blocking and non-blocking deployments",
    version
)]
struct CliArgs {
    /// Base URL of the blocking deployment.
    #[arg(long = "blocking-url", value_name = "url")]
    blocking_url: Url,
    /// Base URL of the non-blocking deployment.
    #[arg(long = "non-blocking-url", value_name = "url")]
    non_blocking_url: Url,
    /// Delay each request asks the server to simulate.
    #[arg(long = "delay-ms", default_value_t = 1000)]
    delay_ms: u64,
    /// Requests sent to each deployment.
    #[arg(long, default_value_t = 200)]
    requests: usize,
    /// Requests in flight at once.
    #[arg(long, default_value_t = 100)]
    concurrency: usize,
    /// Per-request timeout in seconds.
    #[arg(long = "timeout-secs", default_value_t = 120)]
    timeout_secs: u64,
}

/// Latency summary for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Summary {
    succeeded: usize,
    failed: usize,
    p50: Duration,
    p90: Duration,
    p99: Duration,
    max: Duration,
    wall: Duration,
}

impl Summary {
    fn from_samples(mut latencies: Vec<Duration>, failed: usize, wall: Duration) -> Self {
        latencies.sort_unstable();
        Self {
            succeeded: latencies.len(),
            failed,
            p50: percentile(&latencies, 50),
            p90: percentile(&latencies, 90),
            p99: percentile(&latencies, 99),
            max: latencies.last().copied().unwrap_or_default(),
            wall,
        }
    }

    /// Successful requests per second over the whole run.
    fn throughput(&self) -> f64 {
        let secs = self.wall.as_secs_f64();
        if secs > 0.0 {
            self.succeeded as f64 / secs
        } else {
            0.0
        }
    }
}

/// Nearest-rank percentile of an ascending slice.
fn percentile(sorted: &[Duration], pct: usize) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = (pct * sorted.len()).div_ceil(100).max(1);
    sorted
        .get(rank.min(sorted.len()) - 1)
        .copied()
        .unwrap_or_default()
}

fn delay_url(base: &Url, delay_ms: u64) -> Result<Url> {
    base.join(&format!("api/v1/delay/{delay_ms}"))
        .wrap_err_with(|| format!("invalid base URL {base}"))
}

async fn run_load(client: &Client, url: Url, requests: usize, concurrency: usize) -> Summary {
    let started = Instant::now();
    let outcomes: Vec<Option<Duration>> = stream::iter(0..requests)
        .map(|_| {
            let request = client.get(url.clone());
            async move {
                let sent = Instant::now();
                match request.send().await {
                    Ok(response) if response.status().is_success() => {
                        // Drain the body so the timing covers the full response.
                        response.bytes().await.ok().map(|_| sent.elapsed())
                    }
                    _ => None,
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    let wall = started.elapsed();

    let failed = outcomes.iter().filter(|outcome| outcome.is_none()).count();
    Summary::from_samples(outcomes.into_iter().flatten().collect(), failed, wall)
}

fn print_summary(label: &str, summary: &Summary) {
    println!(
        "{label:<13} ok={:<5} failed={:<5} p50={:>6}ms p90={:>6}ms p99={:>6}ms max={:>6}ms wall={:>6}ms rps={:.1}",
        summary.succeeded,
        summary.failed,
        summary.p50.as_millis(),
        summary.p90.as_millis(),
        summary.p99.as_millis(),
        summary.max.as_millis(),
        summary.wall.as_millis(),
        summary.throughput(),
    );
}

async fn async_main(args: CliArgs) -> Result<()> {
    if args.requests == 0 {
        return Err(eyre!("--requests must be at least 1"));
    }
    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .pool_max_idle_per_host(args.concurrency)
        .build()
        .wrap_err("failed to build HTTP client")?;

    let targets = [
        ("blocking", delay_url(&args.blocking_url, args.delay_ms)?),
        ("non-blocking", delay_url(&args.non_blocking_url, args.delay_ms)?),
    ];
    println!(
        "{} requests per deployment, {} in flight, {}ms simulated delay",
        args.requests, args.concurrency, args.delay_ms
    );
    for (label, url) in targets {
        let summary = run_load(&client, url, args.requests, args.concurrency).await;
        print_summary(label, &summary);
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build load-compare runtime")?;
    runtime.block_on(async_main(args))
}
