//! PostgreSQL-backed stores for the blocking deployment.
//!
//! Queries run synchronously on the calling worker thread through an `r2d2`
//! pool. The port methods stay `async` but never yield while the database
//! works, which is the thread-per-request behaviour this deployment models.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::ports::{DatastoreProbe, PostStore, StoreError, UserStore};
use crate::domain::{NewPost, NewUser, Post, PostChanges, PostSearchCondition, User, UserChanges};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_store_macros::{contains_pattern, impl_diesel_stores};
use super::models::{NewPostRow, NewUserRow, PostChangeset, PostRow, UserChangeset, UserRow};
use super::pool::BlockingDbPool;
use super::schema::{posts, users};

/// Synchronous Diesel implementation of the user, post and probe ports.
#[derive(Clone)]
pub struct BlockingDieselStore {
    pool: BlockingDbPool,
}

impl BlockingDieselStore {
    /// Create a new store with the given blocking pool.
    pub fn new(pool: BlockingDbPool) -> Self {
        Self { pool }
    }
}

impl_diesel_stores!(BlockingDieselStore, []);
