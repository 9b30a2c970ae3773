//! Wall-clock comparison of the two deployments on a single worker.
//!
//! Each test binds a real server to an ephemeral port and fires concurrent
//! `GET /api/v1/delay/{ms}` requests over HTTP.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use actix_web::HttpServer;
use futures::future::join_all;
use playground::domain::{DeploymentMode, DelayReport};
use rstest::rstest;

#[path = "support/in_memory_app.rs"]
mod in_memory_app;

use in_memory_app::{api_app, in_memory_state};

const DELAY_MS: u64 = 100;
const REQUESTS: u32 = 4;

/// Run `REQUESTS` concurrent delays against a one-worker server and return
/// the wall-clock time for all of them together with the reports.
async fn concurrent_delays(mode: DeploymentMode, path: &str) -> (Duration, Vec<DelayReport>) {
    let state = in_memory_state(mode);
    let server = HttpServer::new(move || api_app(state.clone()))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind ephemeral port");
    let addr: SocketAddr = *server.addrs().first().expect("bound address");
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let client = reqwest::Client::new();
    let url = format!("http://{addr}{path}");
    let started = Instant::now();
    let responses = join_all((0..REQUESTS).map(|_| {
        let request = client.get(&url);
        async move {
            request
                .send()
                .await
                .expect("request sent")
                .json::<DelayReport>()
                .await
                .expect("delay report")
        }
    }))
    .await;
    let elapsed = started.elapsed();

    handle.stop(false).await;
    (elapsed, responses)
}

#[rstest]
#[actix_rt::test]
async fn blocking_waits_queue_behind_the_worker() {
    let (elapsed, reports) =
        concurrent_delays(DeploymentMode::Blocking, &format!("/api/v1/delay/{DELAY_MS}")).await;

    assert!(elapsed >= Duration::from_millis(DELAY_MS) * REQUESTS);
    for report in &reports {
        assert!(report.actual_delay >= DELAY_MS);
        assert_eq!(report.start_thread, report.end_thread);
    }
}

#[rstest]
#[actix_rt::test]
async fn suspending_waits_share_the_worker() {
    let (elapsed, reports) =
        concurrent_delays(DeploymentMode::NonBlocking, &format!("/api/v1/delay/{DELAY_MS}"))
            .await;

    assert!(elapsed < Duration::from_millis(DELAY_MS) * 3);
    assert!(reports.iter().all(|report| report.actual_delay >= DELAY_MS));
}

#[rstest]
#[actix_rt::test]
async fn anti_pattern_stalls_the_non_blocking_worker() {
    let (elapsed, reports) = concurrent_delays(
        DeploymentMode::NonBlocking,
        &format!("/api/v1/delay/blocking/{DELAY_MS}"),
    )
    .await;

    assert!(elapsed >= Duration::from_millis(DELAY_MS) * REQUESTS);
    assert!(
        reports
            .iter()
            .all(|report| report.message.contains("ANTI-PATTERN"))
    );
}
