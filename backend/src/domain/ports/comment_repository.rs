//! Port for comment storage.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{Comment, CommentDraft};

/// Comment storage. Comments are removed only through their post.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment. The owning post must exist.
    async fn save_comment(&self, draft: &CommentDraft) -> Result<Comment, PersistenceError>;

    /// Fetch one comment; `NotFound` when absent.
    async fn get_comment(&self, id: i32) -> Result<Comment, PersistenceError>;

    /// Every comment ordered by id.
    async fn get_comments(&self) -> Result<Vec<Comment>, PersistenceError>;

    /// Comments of one post ordered by id; empty when none match.
    async fn get_comments_by_post_id(&self, post_id: i32)
    -> Result<Vec<Comment>, PersistenceError>;
}
