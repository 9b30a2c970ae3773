//! Query bodies shared by the async and blocking Diesel stores.
//!
//! Both stores run identical SQL; they differ only in whether each Diesel
//! call is awaited. The invoking module supplies the `RunQueryDsl` in scope
//! (`diesel_async` or `diesel`) together with the schema, row models and error
//! mappers, and passes `[.await]` or `[]` as the suspend tokens.

/// Implement `UserStore`, `PostStore` and `DatastoreProbe` for a store type
/// holding its pool in a `pool` field.
macro_rules! impl_diesel_stores {
    ($store:ty, [$($suspend:tt)*]) => {
        #[async_trait::async_trait]
        impl UserStore for $store {
            async fn insert(&self, new_user: &NewUser) -> Result<User, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                diesel::insert_into(users::table)
                    .values(NewUserRow::from(new_user))
                    .returning(UserRow::as_returning())
                    .get_result(&mut conn)
                    $($suspend)*
                    .map(User::from)
                    .map_err(map_diesel_error)
            }

            async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                users::table
                    .find(id)
                    .select(UserRow::as_select())
                    .first(&mut conn)
                    $($suspend)*
                    .optional()
                    .map(|row| row.map(User::from))
                    .map_err(map_diesel_error)
            }

            async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                users::table
                    .filter(users::email.eq(email))
                    .select(UserRow::as_select())
                    .first(&mut conn)
                    $($suspend)*
                    .optional()
                    .map(|row| row.map(User::from))
                    .map_err(map_diesel_error)
            }

            async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                diesel::select(diesel::dsl::exists(
                    users::table.filter(users::email.eq(email)),
                ))
                .get_result::<bool>(&mut conn)
                $($suspend)*
                .map_err(map_diesel_error)
            }

            async fn find_all(&self) -> Result<Vec<User>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                users::table
                    .order(users::id.asc())
                    .select(UserRow::as_select())
                    .load(&mut conn)
                    $($suspend)*
                    .map(|rows| rows.into_iter().map(User::from).collect())
                    .map_err(map_diesel_error)
            }

            async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                users::table
                    .filter(users::id.eq_any(ids.to_vec()))
                    .order(users::id.asc())
                    .select(UserRow::as_select())
                    .load(&mut conn)
                    $($suspend)*
                    .map(|rows| rows.into_iter().map(User::from).collect())
                    .map_err(map_diesel_error)
            }

            async fn update(
                &self,
                id: i64,
                changes: &UserChanges,
            ) -> Result<Option<User>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                diesel::update(users::table.find(id))
                    .set(UserChangeset::stamped(changes, Utc::now()))
                    .returning(UserRow::as_returning())
                    .get_result(&mut conn)
                    $($suspend)*
                    .optional()
                    .map(|row| row.map(User::from))
                    .map_err(map_diesel_error)
            }

            async fn delete(&self, id: i64) -> Result<bool, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                diesel::delete(users::table.find(id))
                    .execute(&mut conn)
                    $($suspend)*
                    .map(|deleted| deleted > 0)
                    .map_err(map_diesel_error)
            }
        }

        #[async_trait::async_trait]
        impl PostStore for $store {
            async fn insert(&self, new_post: &NewPost) -> Result<Post, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                diesel::insert_into(posts::table)
                    .values(NewPostRow::from(new_post))
                    .returning(PostRow::as_returning())
                    .get_result(&mut conn)
                    $($suspend)*
                    .map(Post::from)
                    .map_err(map_diesel_error)
            }

            async fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                posts::table
                    .find(id)
                    .select(PostRow::as_select())
                    .first(&mut conn)
                    $($suspend)*
                    .optional()
                    .map(|row| row.map(Post::from))
                    .map_err(map_diesel_error)
            }

            async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                posts::table
                    .order(posts::id.asc())
                    .select(PostRow::as_select())
                    .load(&mut conn)
                    $($suspend)*
                    .map(|rows| rows.into_iter().map(Post::from).collect())
                    .map_err(map_diesel_error)
            }

            async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Post>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                posts::table
                    .filter(posts::user_id.eq(user_id))
                    .order(posts::id.asc())
                    .select(PostRow::as_select())
                    .load(&mut conn)
                    $($suspend)*
                    .map(|rows| rows.into_iter().map(Post::from).collect())
                    .map_err(map_diesel_error)
            }

            async fn search(
                &self,
                condition: &PostSearchCondition,
            ) -> Result<Vec<Post>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                let mut query = posts::table
                    .inner_join(users::table)
                    .select(PostRow::as_select())
                    .order(posts::id.asc())
                    .into_boxed();
                if let Some(title) = condition.title() {
                    query = query.filter(posts::title.like(contains_pattern(title)));
                }
                if let Some(content) = condition.content() {
                    query = query.filter(posts::content.like(contains_pattern(content)));
                }
                if let Some(author_name) = condition.author_name() {
                    query = query.filter(users::name.eq(author_name.to_owned()));
                }
                query
                    .load(&mut conn)
                    $($suspend)*
                    .map(|rows| rows.into_iter().map(Post::from).collect())
                    .map_err(map_diesel_error)
            }

            async fn find_page(&self, limit: i64) -> Result<Vec<Post>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                posts::table
                    .order(posts::id.asc())
                    .limit(limit)
                    .select(PostRow::as_select())
                    .load(&mut conn)
                    $($suspend)*
                    .map(|rows| rows.into_iter().map(Post::from).collect())
                    .map_err(map_diesel_error)
            }

            async fn update(
                &self,
                id: i64,
                changes: &PostChanges,
            ) -> Result<Option<Post>, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                diesel::update(posts::table.find(id))
                    .set(PostChangeset::stamped(changes, Utc::now()))
                    .returning(PostRow::as_returning())
                    .get_result(&mut conn)
                    $($suspend)*
                    .optional()
                    .map(|row| row.map(Post::from))
                    .map_err(map_diesel_error)
            }

            async fn delete(&self, id: i64) -> Result<bool, StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                diesel::delete(posts::table.find(id))
                    .execute(&mut conn)
                    $($suspend)*
                    .map(|deleted| deleted > 0)
                    .map_err(map_diesel_error)
            }
        }

        #[async_trait::async_trait]
        impl DatastoreProbe for $store {
            async fn sleep(&self, duration: std::time::Duration) -> Result<(), StoreError> {
                let mut conn = self.pool.get() $($suspend)* .map_err(map_pool_error)?;
                diesel::sql_query("SELECT pg_sleep($1)")
                    .bind::<diesel::sql_types::Double, _>(duration.as_secs_f64())
                    .execute(&mut conn)
                    $($suspend)*
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        }
    };
}

pub(crate) use impl_diesel_stores;

/// `LIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;
    use rstest::rstest;

    #[rstest]
    #[case("Hel", "%Hel%")]
    #[case("100%", "%100\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    #[case("a\\b", "%a\\\\b%")]
    fn escapes_like_wildcards(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }
}
