//! Posts API handlers.
//!
//! ```text
//! POST   /api/v1/posts                 {"title":"Hi","content":"…","userId":1}
//! GET    /api/v1/posts                 author per post, bounded concurrency
//! GET    /api/v1/posts/batch           authors in one batch lookup
//! GET    /api/v1/posts/search?title=&content=&authorName=
//! GET    /api/v1/posts/user/{userId}
//! GET    /api/v1/posts/{id}
//! PUT    /api/v1/posts/{id}            {"title":"New"}
//! DELETE /api/v1/posts/{id}
//! ```
//!
//! The literal routes must be registered before `/posts/{id}`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, NewPost, PostChanges, PostSearchCondition, PostWithAuthor};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::post_validation_error;

/// Request body for `POST /api/v1/posts`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    #[schema(example = "Hello")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "First post")]
    pub content: String,
    #[schema(example = 1)]
    pub user_id: i64,
}

impl TryFrom<CreatePostRequest> for NewPost {
    type Error = Error;

    fn try_from(value: CreatePostRequest) -> Result<Self, Self::Error> {
        NewPost::try_new(value.title, value.content, value.user_id)
            .map_err(post_validation_error)
    }
}

/// Request body for `PUT /api/v1/posts/{id}`. The owner cannot change.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl TryFrom<UpdatePostRequest> for PostChanges {
    type Error = Error;

    fn try_from(value: UpdatePostRequest) -> Result<Self, Self::Error> {
        PostChanges::try_new(value.title, value.content).map_err(post_validation_error)
    }
}

/// Query string of `GET /api/v1/posts/search`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PostSearchQuery {
    /// Case-sensitive substring of the title.
    pub title: Option<String>,
    /// Case-sensitive substring of the content.
    pub content: Option<String>,
    /// Exact author name.
    pub author_name: Option<String>,
}

impl From<PostSearchQuery> for PostSearchCondition {
    fn from(query: PostSearchQuery) -> Self {
        PostSearchCondition::new(query.title, query.content, query.author_name)
    }
}

/// Create a post for an existing user.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostWithAuthor),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Owner not found", body = ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let new_post = NewPost::try_from(payload.into_inner())?;
    let post = state.posts.create_post(new_post).await?;
    Ok(HttpResponse::Created().json(post))
}

/// List every post, resolving authors with bounded concurrent lookups.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "Posts", body = [PostWithAuthor]),
        (status = 503, description = "Datastore unavailable", body = ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PostWithAuthor>>> {
    Ok(web::Json(state.posts.list_posts().await?))
}

/// List every post, resolving authors with a single batch lookup.
#[utoipa::path(
    get,
    path = "/api/v1/posts/batch",
    responses(
        (status = 200, description = "Posts", body = [PostWithAuthor]),
        (status = 503, description = "Datastore unavailable", body = ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "listPostsBatch"
)]
#[get("/posts/batch")]
pub async fn list_posts_batch(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PostWithAuthor>>> {
    Ok(web::Json(state.posts.list_posts_batch().await?))
}

/// Search posts; every supplied filter must match.
#[utoipa::path(
    get,
    path = "/api/v1/posts/search",
    params(PostSearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = [PostWithAuthor]),
        (status = 400, description = "Invalid query", body = ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "searchPosts"
)]
#[get("/posts/search")]
pub async fn search_posts(
    state: web::Data<HttpState>,
    query: web::Query<PostSearchQuery>,
) -> ApiResult<web::Json<Vec<PostWithAuthor>>> {
    let condition = PostSearchCondition::from(query.into_inner());
    Ok(web::Json(state.posts.search_posts(&condition).await?))
}

/// List the posts of one user.
#[utoipa::path(
    get,
    path = "/api/v1/posts/user/{userId}",
    params(("userId" = i64, Path, description = "Owner identifier")),
    responses(
        (status = 200, description = "Posts of the user", body = [PostWithAuthor]),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "listPostsByUser"
)]
#[get("/posts/user/{userId}")]
pub async fn list_posts_by_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<PostWithAuthor>>> {
    Ok(web::Json(
        state.posts.list_posts_by_user(path.into_inner()).await?,
    ))
}

/// Fetch one post with its author.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostWithAuthor),
        (status = 404, description = "Post not found", body = ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostWithAuthor>> {
    Ok(web::Json(state.posts.get_post(path.into_inner()).await?))
}

/// Apply a partial update to a post.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostWithAuthor),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Post not found", body = ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostWithAuthor>> {
    let changes = PostChanges::try_from(payload.into_inner())?;
    Ok(web::Json(
        state.posts.update_post(path.into_inner(), changes).await?,
    ))
}

/// Delete a post.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ErrorEnvelope)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.posts.delete_post(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
