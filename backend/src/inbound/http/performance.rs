//! Datastore performance probes.
//!
//! ```text
//! GET /api/v1/performance/sleep   hold one connection for a second
//! GET /api/v1/performance/bulk    up to 1000 raw posts
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::Post;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Keep a datastore connection busy for one second.
#[utoipa::path(
    get,
    path = "/api/v1/performance/sleep",
    responses(
        (status = 200, description = "Sleep finished"),
        (status = 503, description = "Datastore unavailable", body = ErrorEnvelope)
    ),
    tags = ["performance"],
    operation_id = "datastoreSleep"
)]
#[get("/performance/sleep")]
pub async fn datastore_sleep(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state.performance.datastore_sleep().await?;
    Ok(HttpResponse::Ok().finish())
}

/// Read a bounded page of posts without author resolution.
#[utoipa::path(
    get,
    path = "/api/v1/performance/bulk",
    responses(
        (status = 200, description = "Posts ordered by id", body = [Post]),
        (status = 503, description = "Datastore unavailable", body = ErrorEnvelope)
    ),
    tags = ["performance"],
    operation_id = "bulkPosts"
)]
#[get("/performance/bulk")]
pub async fn bulk_posts(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Post>>> {
    Ok(web::Json(state.performance.bulk_posts().await?))
}
