//! Diesel table definitions.
//!
//! These must match `migrations/` exactly.

diesel::table! {
    /// Blog posts. `user_id` is not a foreign key.
    posts (id) {
        id -> Integer,
        user_id -> Integer,
        title -> Text,
        body -> Text,
    }
}

diesel::table! {
    /// Comments; `post_id` cascades on update and delete.
    comments (id) {
        id -> Integer,
        post_id -> Integer,
        name -> Text,
        email -> Text,
        body -> Text,
    }
}

diesel::table! {
    users (id) {
        id -> Integer,
        email -> Text,
        name -> Text,
    }
}

diesel::table! {
    /// One row per provider account, keyed by `(provider, external_id)`.
    external_identities (provider, external_id) {
        provider -> Text,
        external_id -> Text,
        user_id -> Integer,
    }
}

diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(external_identities -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(posts, comments, users, external_identities);
