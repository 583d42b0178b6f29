//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts keyed by a unique email address.
    users (id) {
        id -> Int8,
        /// Local part as supplied, domain part lower-cased.
        email -> Varchar,
        name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        is_active -> Bool,
        is_staff -> Bool,
        is_superuser -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One bearer token digest per user.
    auth_tokens (user_id) {
        user_id -> Int8,
        /// Lower-case hex SHA-256 of the raw token.
        token_digest -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Varchar,
        description -> Text,
        time_minutes -> Int4,
        /// `NUMERIC(5, 2)`.
        price -> Numeric,
        link -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tags are unique per `(user_id, name)`.
    tags (id) {
        id -> Int8,
        user_id -> Int8,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe-tag associations. `position` preserves request order.
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
        user_id -> Int8,
        position -> Int4,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(tags -> users (user_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(auth_tokens, recipe_tags, recipes, tags, users);
