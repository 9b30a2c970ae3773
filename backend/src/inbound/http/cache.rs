//! Cache management handlers used by load tests to reset state.
//!
//! ```text
//! DELETE /api/v1/cache/users/{userId}
//! DELETE /api/v1/cache/clear-all
//! ```
//!
//! Both answer 204 even when the cache backend fails; failures are logged.

use actix_web::{HttpResponse, delete, web};

use crate::inbound::http::state::HttpState;

/// Evict one cached user.
#[utoipa::path(
    delete,
    path = "/api/v1/cache/users/{userId}",
    params(("userId" = i64, Path, description = "User identifier")),
    responses((status = 204, description = "Entry evicted")),
    tags = ["cache"],
    operation_id = "evictUser"
)]
#[delete("/cache/users/{userId}")]
pub async fn evict_user(state: web::Data<HttpState>, path: web::Path<i64>) -> HttpResponse {
    state.users.evict_cached(path.into_inner()).await;
    HttpResponse::NoContent().finish()
}

/// Evict every cached user.
#[utoipa::path(
    delete,
    path = "/api/v1/cache/clear-all",
    responses((status = 204, description = "Cache cleared")),
    tags = ["cache"],
    operation_id = "clearCache"
)]
#[delete("/cache/clear-all")]
pub async fn clear_all(state: web::Data<HttpState>) -> HttpResponse {
    state.users.clear_cached().await;
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use crate::domain::DeploymentMode;
    use crate::inbound::http::test_utils::{in_memory_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    #[rstest]
    #[case("/api/v1/cache/users/1")]
    #[case("/api/v1/cache/clear-all")]
    #[actix_web::test]
    async fn cache_resets_answer_no_content(#[case] uri: &str) {
        let app =
            actix_test::init_service(test_app(in_memory_state(DeploymentMode::NonBlocking))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri(uri).to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
