//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every API route lives under `/api/v1`; health probes sit at the root.
//! [`api_scope`] assembles the routes for one deployment mode so the server
//! and the handler tests register exactly the same table.

pub mod cache;
pub mod delay;
pub mod error;
pub mod health;
pub mod performance;
pub mod posts;
pub mod state;
pub mod streams;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::{Scope, web};

use crate::domain::DeploymentMode;

/// Build the `/api/v1` scope for `mode`.
///
/// Literal post routes are registered ahead of `/posts/{id}`. The
/// anti-pattern `/delay/blocking/{ms}` route exists only in the non-blocking
/// deployment.
pub fn api_scope(mode: DeploymentMode) -> Scope {
    let scope = web::scope("/api/v1")
        .app_data(validation::json_config())
        .app_data(validation::path_config())
        .app_data(validation::query_config())
        .service(users::create_user)
        .service(users::list_users)
        .service(users::get_user_by_email)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(posts::create_post)
        .service(posts::list_posts)
        .service(posts::list_posts_batch)
        .service(posts::search_posts)
        .service(posts::list_posts_by_user)
        .service(posts::get_post)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(delay::cpu_delay)
        .service(delay::delay)
        .service(streams::stream_news)
        .service(streams::stream_stock)
        .service(streams::stream_combined)
        .service(cache::clear_all)
        .service(cache::evict_user)
        .service(performance::datastore_sleep)
        .service(performance::bulk_posts);

    match mode {
        DeploymentMode::NonBlocking => scope.service(delay::blocking_delay),
        DeploymentMode::Blocking => scope,
    }
}
