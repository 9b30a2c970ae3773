//! Post use-cases.
//!
//! Every post handed to clients carries its author's name. Listings resolve
//! authors either with bounded concurrent lookups ([`PostService::list_posts`])
//! or with one batch query ([`PostService::list_posts_batch`]) so the two
//! strategies can be compared under load.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures_util::{StreamExt, TryStreamExt, stream};
use tracing::{info, warn};

use crate::domain::ports::{PostStore, StoreError, UserStore};
use crate::domain::{
    Error, NewPost, Post, PostChanges, PostSearchCondition, PostWithAuthor, User,
};

/// Maximum author lookups in flight for [`PostService::list_posts`].
pub const AUTHOR_FETCH_CONCURRENCY: usize = 16;

fn post_not_found(id: i64) -> Error {
    Error::not_found(format!("Post not found with id: {id}"))
}

fn user_not_found(id: i64) -> Error {
    Error::not_found(format!("User not found with id: {id}"))
}

/// Post service over a [`PostStore`] and the [`UserStore`] that owns authors.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
}

impl PostService {
    /// Create a new service.
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        Self { posts, users }
    }

    async fn author(&self, user_id: i64) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))
    }

    /// Create a post owned by an existing user.
    ///
    /// # Errors
    /// Not found when the owner does not exist.
    pub async fn create_post(&self, new_post: NewPost) -> Result<PostWithAuthor, Error> {
        let author = self.author(new_post.user_id()).await?;
        let post = self
            .posts
            .insert(&new_post)
            .await
            .map_err(|err| match err {
                StoreError::MissingReference { .. } => user_not_found(new_post.user_id()),
                other => other.into(),
            })?;
        info!(post_id = post.id, user_id = author.id, "post created");
        Ok(post.with_author(author.name))
    }

    /// Fetch one post with its author.
    ///
    /// # Errors
    /// Not found when the post or its author is absent.
    pub async fn get_post(&self, id: i64) -> Result<PostWithAuthor, Error> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| post_not_found(id))?;
        let author = self.author(post.user_id).await?;
        Ok(post.with_author(author.name))
    }

    /// Posts matching every filter in `condition`.
    ///
    /// # Errors
    /// Store failures only; no match yields an empty list.
    pub async fn search_posts(
        &self,
        condition: &PostSearchCondition,
    ) -> Result<Vec<PostWithAuthor>, Error> {
        let posts = self.posts.search(condition).await?;
        self.attach_authors(posts).await
    }

    /// Posts owned by `user_id`.
    ///
    /// # Errors
    /// Not found when the user does not exist.
    pub async fn list_posts_by_user(&self, user_id: i64) -> Result<Vec<PostWithAuthor>, Error> {
        let author = self.author(user_id).await?;
        let posts = self.posts.find_by_user_id(user_id).await?;
        Ok(posts
            .into_iter()
            .map(|post| post.with_author(author.name.clone()))
            .collect())
    }

    /// Every post, resolving authors one lookup per post with at most
    /// [`AUTHOR_FETCH_CONCURRENCY`] lookups in flight. Output keeps store order.
    ///
    /// # Errors
    /// Store failures from any lookup.
    pub async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, Error> {
        let posts = self.posts.find_all().await?;
        let users = &self.users;
        stream::iter(posts)
            .map(|post| async move {
                let author = users.find_by_id(post.user_id).await?;
                Ok::<_, Error>(match author {
                    Some(author) => Some(post.with_author(author.name)),
                    None => {
                        warn!(post_id = post.id, user_id = post.user_id, "post author vanished");
                        None
                    }
                })
            })
            .buffered(AUTHOR_FETCH_CONCURRENCY)
            .try_filter_map(|joined| async move { Ok(joined) })
            .try_collect()
            .await
    }

    /// Every post, resolving all authors with a single batch lookup.
    ///
    /// # Errors
    /// Store failures only.
    pub async fn list_posts_batch(&self) -> Result<Vec<PostWithAuthor>, Error> {
        let posts = self.posts.find_all().await?;
        self.attach_authors(posts).await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    /// Not found when the post is absent.
    pub async fn update_post(
        &self,
        id: i64,
        changes: PostChanges,
    ) -> Result<PostWithAuthor, Error> {
        let post = self
            .posts
            .update(id, &changes)
            .await?
            .ok_or_else(|| post_not_found(id))?;
        let author = self.author(post.user_id).await?;
        info!(post_id = id, "post updated");
        Ok(post.with_author(author.name))
    }

    /// Delete a post.
    ///
    /// # Errors
    /// Not found when the post is absent.
    pub async fn delete_post(&self, id: i64) -> Result<(), Error> {
        if !self.posts.delete(id).await? {
            return Err(post_not_found(id));
        }
        info!(post_id = id, "post deleted");
        Ok(())
    }

    async fn attach_authors(&self, posts: Vec<Post>) -> Result<Vec<PostWithAuthor>, Error> {
        let author_ids: Vec<i64> = posts
            .iter()
            .map(|post| post.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let names: HashMap<i64, String> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();

        Ok(posts
            .into_iter()
            .filter_map(|post| match names.get(&post.user_id) {
                Some(name) => Some(post.with_author(name.clone())),
                None => {
                    warn!(post_id = post.id, user_id = post.user_id, "post author vanished");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
