//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. `diesel print-schema`
//! can regenerate them from a live database.

diesel::table! {
    /// Registered users. `email` carries a unique constraint.
    users (id) {
        id -> Int8,
        /// Unique address, at most 255 characters.
        email -> Varchar,
        /// Display name, 2 to 100 characters.
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts owned by a user. Rows are removed with their owner.
    posts (id) {
        id -> Int8,
        title -> Varchar,
        content -> Text,
        user_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(posts, users);
