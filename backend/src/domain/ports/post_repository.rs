//! Port for post storage.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{Post, PostDraft};

/// Post storage used by the HTTP adapters and the seed import.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post, assigning an id when the draft has none.
    async fn save_post(&self, draft: &PostDraft) -> Result<Post, PersistenceError>;

    /// Fetch one post; `NotFound` when absent.
    async fn get_post(&self, id: i32) -> Result<Post, PersistenceError>;

    /// Every post ordered by id.
    async fn get_posts(&self) -> Result<Vec<Post>, PersistenceError>;

    /// Replace the title, body and author of an existing post.
    ///
    /// Fails with `NotFound` instead of inserting when the id is unknown.
    async fn update_post(&self, post: &Post) -> Result<Post, PersistenceError>;

    /// Delete a post and its comments atomically; `NotFound` when absent.
    async fn delete_post(&self, id: i32) -> Result<(), PersistenceError>;
}
