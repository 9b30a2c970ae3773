//! PostgreSQL-backed stores for the non-blocking deployment.
//!
//! Every query awaits a `diesel-async` connection, so a saturated pool parks
//! the request future instead of the worker thread.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DatastoreProbe, PostStore, StoreError, UserStore};
use crate::domain::{NewPost, NewUser, Post, PostChanges, PostSearchCondition, User, UserChanges};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_store_macros::{contains_pattern, impl_diesel_stores};
use super::models::{NewPostRow, NewUserRow, PostChangeset, PostRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::{posts, users};

/// Diesel-backed implementation of the user, post and probe ports.
#[derive(Clone)]
pub struct DieselStore {
    pool: DbPool,
}

impl DieselStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl_diesel_stores!(DieselStore, [.await]);
