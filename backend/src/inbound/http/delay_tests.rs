//! Tests for delay and CPU benchmark handlers.

use super::*;
use crate::domain::DeploymentMode;
use crate::inbound::http::test_utils::{in_memory_state, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::Value;

async fn get(mode: DeploymentMode, uri: &str) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(in_memory_state(mode))).await;
    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[rstest]
#[case(DeploymentMode::Blocking, "Blocking delay completed")]
#[case(DeploymentMode::NonBlocking, "Non-blocking delay completed")]
#[actix_web::test]
async fn delay_reports_mode_specific_message(
    #[case] mode: DeploymentMode,
    #[case] message: &str,
) {
    let (status, body) = get(mode, "/api/v1/delay/20").await;

    assert_eq!(status, StatusCode::OK);
    let report: DelayReport = serde_json::from_value(body).expect("delay report");
    assert_eq!(report.requested_delay, 20);
    assert!(report.actual_delay >= 20);
    assert_eq!(report.message, message);
    assert!(!report.start_thread.is_empty());
}

#[rstest]
#[case("/api/v1/delay/-1", "delay must be between 0 and 60000 milliseconds")]
#[case("/api/v1/delay/60001", "delay must be between 0 and 60000 milliseconds")]
#[case("/api/v1/delay/cpu/-5", "iterations must be between 0 and 10000000000")]
#[actix_web::test]
async fn out_of_range_parameters_are_rejected(#[case] uri: &str, #[case] message: &str) {
    let (status, body) = get(DeploymentMode::NonBlocking, uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], message);
    assert_eq!(body["path"], uri);
}

#[rstest]
#[actix_web::test]
async fn non_numeric_delay_is_a_bad_request() {
    let (status, body) = get(DeploymentMode::Blocking, "/api/v1/delay/soon").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "BAD_REQUEST");
}

#[rstest]
#[actix_web::test]
async fn cpu_delay_sums_squares() {
    let (status, body) = get(DeploymentMode::NonBlocking, "/api/v1/delay/cpu/1000").await;

    assert_eq!(status, StatusCode::OK);
    let report: CpuReport = serde_json::from_value(body).expect("cpu report");
    assert_eq!(report.iterations, 1000);
    assert_eq!(report.result, 332_833_500);
}

#[rstest]
#[actix_web::test]
async fn anti_pattern_route_exists_only_when_non_blocking() {
    let (blocking, _) = get(DeploymentMode::Blocking, "/api/v1/delay/blocking/5").await;
    let (status, body) = get(DeploymentMode::NonBlocking, "/api/v1/delay/blocking/5").await;

    assert_eq!(blocking, StatusCode::NOT_FOUND);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "BLOCKING delay completed - THIS IS AN ANTI-PATTERN!"
    );
}
