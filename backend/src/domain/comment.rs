//! Comments attached to posts.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A stored comment. Deleting its post deletes it too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Owning post.
    #[schema(example = 1)]
    pub post_id: i32,
    /// Store-assigned identity.
    #[schema(example = 1)]
    pub id: i32,
    /// Commenter display name.
    pub name: String,
    /// Commenter email.
    pub email: String,
    /// Plain-text body.
    pub body: String,
}

/// A comment that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentDraft {
    /// Explicit identity, if any.
    pub id: Option<i32>,
    /// Owning post.
    pub post_id: i32,
    /// Commenter display name.
    pub name: String,
    /// Commenter email.
    pub email: String,
    /// Plain-text body.
    pub body: String,
}

/// Reasons a submitted comment is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommentValidationError {
    /// Name missing or blank.
    #[error("comment name must not be empty")]
    EmptyName,
    /// Email missing or blank.
    #[error("comment email must not be empty")]
    EmptyEmail,
    /// Body missing or blank.
    #[error("comment body must not be empty")]
    EmptyBody,
}

impl CommentValidationError {
    /// Form field the error refers to.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyEmail => "email",
            Self::EmptyBody => "body",
        }
    }
}

impl CommentDraft {
    /// Validate user-submitted content and build a draft without an id.
    pub fn try_new(
        post_id: i32,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, CommentValidationError> {
        let draft = Self {
            id: None,
            post_id,
            name: name.into(),
            email: email.into(),
            body: body.into(),
        };
        if draft.name.trim().is_empty() {
            return Err(CommentValidationError::EmptyName);
        }
        if draft.email.trim().is_empty() {
            return Err(CommentValidationError::EmptyEmail);
        }
        if draft.body.trim().is_empty() {
            return Err(CommentValidationError::EmptyBody);
        }
        Ok(draft)
    }

    /// Materialise the draft with the identity chosen by the store.
    #[must_use]
    pub fn into_comment(self, id: i32) -> Comment {
        Comment {
            post_id: self.post_id,
            id,
            name: self.name,
            email: self.email,
            body: self.body,
        }
    }
}

impl From<Comment> for CommentDraft {
    fn from(comment: Comment) -> Self {
        Self {
            id: (comment.id != 0).then_some(comment.id),
            post_id: comment.post_id,
            name: comment.name,
            email: comment.email,
            body: comment.body,
        }
    }
}
