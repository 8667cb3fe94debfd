//! Copy a user's posts and their comments from a seed source into the store.
//!
//! The post list is fetched once and a failure there aborts the import.
//! Everything after that is best effort: each post is saved, then one task
//! per saved post fetches and stores its comments. Failures are logged and
//! counted, and the import waits for every task before returning.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{Instrument, error, info, info_span, warn};

use super::ports::{CommentRepository, PostRepository, SeedSource, SeedSourceError};
use super::{CommentDraft, PostDraft};

/// Fatal import failures.
#[derive(Debug, Error)]
pub enum SeedImportError {
    /// The post list could not be fetched.
    #[error("failed to fetch posts for user {user_id}: {source}")]
    FetchPosts {
        /// User whose posts were requested.
        user_id: i32,
        /// Underlying source error.
        #[source]
        source: SeedSourceError,
    },
}

/// Counters reported at the end of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Posts returned by the source.
    pub posts_fetched: usize,
    /// Posts stored.
    pub posts_saved: usize,
    /// Posts the store rejected.
    pub posts_failed: usize,
    /// Comments stored.
    pub comments_saved: usize,
    /// Comments the store rejected.
    pub comments_failed: usize,
    /// Posts whose comment list could not be fetched.
    pub comment_fetches_failed: usize,
}

#[derive(Debug, Default)]
struct CommentOutcome {
    saved: usize,
    failed: usize,
    fetch_failed: bool,
}

/// Fan-out importer over the seed source and the storage ports.
#[derive(Clone)]
pub struct SeedImporter {
    source: Arc<dyn SeedSource>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl SeedImporter {
    /// Build an importer.
    #[must_use]
    pub const fn new(
        source: Arc<dyn SeedSource>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            source,
            posts,
            comments,
        }
    }

    /// Import every post of `user_id` and the comments on each.
    ///
    /// # Errors
    /// [`SeedImportError::FetchPosts`] when the post list is unavailable.
    /// Per-post and per-comment failures only show up in the summary.
    pub async fn import_user_posts(&self, user_id: i32) -> Result<ImportSummary, SeedImportError> {
        let posts = self
            .source
            .fetch_posts(user_id)
            .await
            .map_err(|source| SeedImportError::FetchPosts { user_id, source })?;

        let mut summary = ImportSummary {
            posts_fetched: posts.len(),
            ..ImportSummary::default()
        };
        info!(user_id, count = posts.len(), "fetched seed posts");

        let mut tasks = JoinSet::new();
        for post in posts {
            let post_id = post.id;
            match self.posts.save_post(&PostDraft::from(post)).await {
                Ok(saved) => {
                    summary.posts_saved += 1;
                    let source = Arc::clone(&self.source);
                    let comments = Arc::clone(&self.comments);
                    tasks.spawn(
                        import_comments(source, comments, saved.id)
                            .instrument(info_span!("seed_comments", post_id = saved.id)),
                    );
                }
                Err(err) => {
                    summary.posts_failed += 1;
                    warn!(post_id, error = %err, "skipping seed post");
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    summary.comments_saved += outcome.saved;
                    summary.comments_failed += outcome.failed;
                    if outcome.fetch_failed {
                        summary.comment_fetches_failed += 1;
                    }
                }
                Err(err) => {
                    summary.comment_fetches_failed += 1;
                    error!(error = %err, "comment import task aborted");
                }
            }
        }

        info!(?summary, "seed import finished");
        Ok(summary)
    }
}

async fn import_comments(
    source: Arc<dyn SeedSource>,
    comments: Arc<dyn CommentRepository>,
    post_id: i32,
) -> CommentOutcome {
    let mut outcome = CommentOutcome::default();
    let fetched = match source.fetch_comments(post_id).await {
        Ok(fetched) => fetched,
        Err(err) => {
            warn!(post_id, error = %err, "could not fetch seed comments");
            outcome.fetch_failed = true;
            return outcome;
        }
    };

    for comment in fetched {
        let comment_id = comment.id;
        match comments.save_comment(&CommentDraft::from(comment)).await {
            Ok(_) => outcome.saved += 1,
            Err(err) => {
                outcome.failed += 1;
                warn!(post_id, comment_id, error = %err, "skipping seed comment");
            }
        }
    }
    outcome
}

impl std::fmt::Debug for SeedImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedImporter").finish_non_exhaustive()
    }
}
