//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the request, response, and error envelope schemas. The generated
//! document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::streaming::{News, StockPrice};
use crate::domain::{CpuReport, DelayReport, Post, PostWithAuthor, User};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::posts::{CreatePostRequest, UpdatePostRequest};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Concurrency playground API",
        description = "CRUD, delay, and streaming endpoints served identically by the blocking and non-blocking deployments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::get_user_by_email,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::list_posts_batch,
        crate::inbound::http::posts::search_posts,
        crate::inbound::http::posts::list_posts_by_user,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::delay::delay,
        crate::inbound::http::delay::cpu_delay,
        crate::inbound::http::delay::blocking_delay,
        crate::inbound::http::streams::stream_news,
        crate::inbound::http::streams::stream_stock,
        crate::inbound::http::streams::stream_combined,
        crate::inbound::http::cache::evict_user,
        crate::inbound::http::cache::clear_all,
        crate::inbound::http::performance::datastore_sleep,
        crate::inbound::http::performance::bulk_posts,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Post,
        PostWithAuthor,
        CreateUserRequest,
        UpdateUserRequest,
        CreatePostRequest,
        UpdatePostRequest,
        DelayReport,
        CpuReport,
        News,
        StockPrice,
        ErrorEnvelope,
        ProbeStatus,
    )),
    tags(
        (name = "users", description = "User CRUD"),
        (name = "posts", description = "Post CRUD and author resolution strategies"),
        (name = "benchmark", description = "Simulated I/O and CPU load"),
        (name = "streams", description = "Server-sent event demos"),
        (name = "cache", description = "User cache maintenance"),
        (name = "performance", description = "Datastore load probes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's paths and schema fields.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/api/v1/users/{id}")]
    #[case("/api/v1/users/email/{email}")]
    #[case("/api/v1/posts/batch")]
    #[case("/api/v1/posts/search")]
    #[case("/api/v1/delay/{ms}")]
    #[case("/api/v1/delay/blocking/{ms}")]
    #[case("/api/v1/stream/combined")]
    #[case("/api/v1/cache/clear-all")]
    #[case("/api/v1/performance/bulk")]
    #[case("/health/ready")]
    fn document_lists_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("ErrorEnvelope", &["status", "error", "message", "errorCode", "path", "traceId"])]
    #[case("PostWithAuthor", &["id", "title", "content", "userId", "authorName"])]
    #[case("DelayReport", &["requestedDelay", "actualDelay", "startThread", "endThread", "message"])]
    fn schemas_use_camel_case_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");

        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }
}
