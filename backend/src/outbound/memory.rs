//! In-process store used when no database URL is configured and in tests.
//!
//! Mirrors the PostgreSQL schema rules: ids are assigned from 1 upwards,
//! emails are unique, posts need an existing owner and are removed with it.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{DatastoreProbe, PostStore, StoreError, UserStore};
use crate::domain::{
    NewPost, NewUser, Post, PostChanges, PostSearchCondition, User, UserChanges, WaitStyle,
};

const EMAIL_CONSTRAINT: &str = "users_email_key";
const OWNER_CONSTRAINT: &str = "posts_user_id_fkey";

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    last_user_id: i64,
    last_post_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }

    fn author_name(&self, user_id: i64) -> Option<&str> {
        self.users.get(&user_id).map(|user| user.name.as_str())
    }
}

/// Thread-safe in-memory implementation of the store ports.
///
/// The probe sleep uses the configured [`WaitStyle`] in place of a
/// server-side `pg_sleep`.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    probe_wait: WaitStyle,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store whose probe suspends.
    pub fn new() -> Self {
        Self::with_probe_wait(WaitStyle::Suspend)
    }

    /// Create an empty store whose probe waits in `probe_wait` style.
    pub fn with_probe_wait(probe_wait: WaitStyle) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            probe_wait,
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables();
        if tables.email_taken(new_user.email().as_str(), None) {
            return Err(StoreError::conflict(EMAIL_CONSTRAINT));
        }
        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            email: new_user.email().as_str().to_owned(),
            name: new_user.name().as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.tables().email_taken(email, None))
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables().users.values().cloned().collect())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        let tables = self.tables();
        Ok(tables
            .users
            .values()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables();
        if let Some(email) = changes.email() {
            if tables.email_taken(email.as_str(), Some(id)) {
                return Err(StoreError::conflict(EMAIL_CONSTRAINT));
            }
        }
        Ok(tables.users.get_mut(&id).map(|user| {
            changes.apply_to(user, Utc::now());
            user.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.posts.retain(|_, post| post.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn insert(&self, new_post: &NewPost) -> Result<Post, StoreError> {
        let mut tables = self.tables();
        if !tables.users.contains_key(&new_post.user_id()) {
            return Err(StoreError::missing_reference(OWNER_CONSTRAINT));
        }
        tables.last_post_id += 1;
        let now = Utc::now();
        let post = Post {
            id: tables.last_post_id,
            title: new_post.title().as_str().to_owned(),
            content: new_post.content().as_str().to_owned(),
            user_id: new_post.user_id(),
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        Ok(self.tables().posts.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.tables().posts.values().cloned().collect())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, StoreError> {
        Ok(self
            .tables()
            .posts
            .values()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn search(&self, condition: &PostSearchCondition) -> Result<Vec<Post>, StoreError> {
        let tables = self.tables();
        Ok(tables
            .posts
            .values()
            .filter(|post| {
                tables
                    .author_name(post.user_id)
                    .is_some_and(|author| condition.matches(post, author))
            })
            .cloned()
            .collect())
    }

    async fn find_page(&self, limit: i64) -> Result<Vec<Post>, StoreError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.tables().posts.values().take(limit).cloned().collect())
    }

    async fn update(&self, id: i64, changes: &PostChanges) -> Result<Option<Post>, StoreError> {
        Ok(self.tables().posts.get_mut(&id).map(|post| {
            changes.apply_to(post, Utc::now());
            post.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables().posts.remove(&id).is_some())
    }
}

#[async_trait]
impl DatastoreProbe for InMemoryStore {
    async fn sleep(&self, duration: Duration) -> Result<(), StoreError> {
        self.probe_wait.wait(duration).await;
        Ok(())
    }
}
