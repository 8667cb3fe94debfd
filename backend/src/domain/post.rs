//! Blog posts.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A stored post.
///
/// `user_id` names the author but is not enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Author reference.
    #[schema(example = 7)]
    pub user_id: i32,
    /// Store-assigned identity.
    #[schema(example = 1)]
    pub id: i32,
    /// Headline.
    pub title: String,
    /// Plain-text body.
    pub body: String,
}

/// A post that has not been stored yet.
///
/// `id` is `None` when the store should assign one; the seed import passes
/// the upstream ids through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostDraft {
    /// Explicit identity, if any.
    pub id: Option<i32>,
    /// Author reference.
    pub user_id: i32,
    /// Headline.
    pub title: String,
    /// Plain-text body.
    pub body: String,
}

/// Reasons a submitted post is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PostValidationError {
    /// Title missing or blank.
    #[error("post title must not be empty")]
    EmptyTitle,
    /// Body missing or blank.
    #[error("post body must not be empty")]
    EmptyBody,
}

impl PostValidationError {
    /// Form field the error refers to.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyBody => "body",
        }
    }
}

impl PostDraft {
    /// Validate user-submitted content and build a draft without an id.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{PostDraft, PostValidationError};
    ///
    /// let draft = PostDraft::try_new(1, "Hello", "World").unwrap();
    /// assert_eq!(draft.id, None);
    /// assert_eq!(
    ///     PostDraft::try_new(1, " ", "World"),
    ///     Err(PostValidationError::EmptyTitle)
    /// );
    /// ```
    pub fn try_new(
        user_id: i32,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, PostValidationError> {
        let draft = Self {
            id: None,
            user_id,
            title: title.into(),
            body: body.into(),
        };
        if draft.title.trim().is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if draft.body.trim().is_empty() {
            return Err(PostValidationError::EmptyBody);
        }
        Ok(draft)
    }

    /// Materialise the draft with the identity chosen by the store.
    #[must_use]
    pub fn into_post(self, id: i32) -> Post {
        Post {
            user_id: self.user_id,
            id,
            title: self.title,
            body: self.body,
        }
    }
}

impl From<Post> for PostDraft {
    /// A zero id is treated as unassigned, matching JSON payloads that omit it.
    fn from(post: Post) -> Self {
        Self {
            id: (post.id != 0).then_some(post.id),
            user_id: post.user_id,
            title: post.title,
            body: post.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "body", PostValidationError::EmptyTitle)]
    #[case("title", "\n\t", PostValidationError::EmptyBody)]
    fn blank_fields_are_rejected(
        #[case] title: &str,
        #[case] body: &str,
        #[case] expected: PostValidationError,
    ) {
        assert_eq!(PostDraft::try_new(1, title, body), Err(expected));
    }

    #[rstest]
    #[case(0, None)]
    #[case(12, Some(12))]
    fn zero_id_means_unassigned(#[case] id: i32, #[case] expected: Option<i32>) {
        let post = Post {
            user_id: 1,
            id,
            title: "t".to_owned(),
            body: "b".to_owned(),
        };
        assert_eq!(PostDraft::from(post).id, expected);
    }

    #[rstest]
    fn camel_case_wire_names() {
        let post: Post = serde_json::from_str(r#"{"userId":7,"id":3,"title":"t","body":"b"}"#)
            .expect("decode post");
        assert_eq!(post.user_id, 7);
        assert_eq!(post.id, 3);
    }
}
