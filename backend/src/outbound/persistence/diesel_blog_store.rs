//! Diesel-backed post and comment storage.

use async_trait::async_trait;
use diesel::prelude::*;
use tracing::debug;

use super::diesel_basic_error_mapping::not_found_as;
use super::models::{CommentRow, NewCommentRow, NewPostRow, PostRow, PostUpdate};
use super::pool::DbPool;
use super::schema::{comments, posts};
use crate::domain::ports::{CommentRepository, PersistenceError, PostRepository};
use crate::domain::{Comment, CommentDraft, Post, PostDraft};

/// SQLite store for posts and comments. Also runs the schema migrations.
#[derive(Clone, Debug)]
pub struct DieselBlogStore {
    pool: DbPool,
}

impl DieselBlogStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(super) const fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl PostRepository for DieselBlogStore {
    async fn save_post(&self, draft: &PostDraft) -> Result<Post, PersistenceError> {
        let owned = draft.clone();
        let saved = self
            .pool
            .run(move |conn| {
                diesel::insert_into(posts::table)
                    .values(NewPostRow::from(&owned))
                    .returning(PostRow::as_returning())
                    .get_result::<PostRow>(conn)
                    .map_err(PersistenceError::from)
            })
            .await?;
        debug!(post_id = saved.id, "post saved");
        Ok(saved.into())
    }

    async fn get_post(&self, id: i32) -> Result<Post, PersistenceError> {
        self.pool
            .run(move |conn| {
                posts::table
                    .find(id)
                    .select(PostRow::as_select())
                    .first::<PostRow>(conn)
                    .map(Post::from)
                    .map_err(not_found_as(format!("post {id} not found")))
            })
            .await
    }

    async fn get_posts(&self) -> Result<Vec<Post>, PersistenceError> {
        self.pool
            .run(|conn| {
                posts::table
                    .select(PostRow::as_select())
                    .order(posts::id.asc())
                    .load::<PostRow>(conn)
                    .map(|rows| rows.into_iter().map(Post::from).collect())
                    .map_err(PersistenceError::from)
            })
            .await
    }

    async fn update_post(&self, post: &Post) -> Result<Post, PersistenceError> {
        let replacement = post.clone();
        self.pool
            .run(move |conn| {
                diesel::update(posts::table.find(replacement.id))
                    .set(PostUpdate::from(&replacement))
                    .returning(PostRow::as_returning())
                    .get_result::<PostRow>(conn)
                    .map(Post::from)
                    .map_err(not_found_as(format!("post {} not found", replacement.id)))
            })
            .await
    }

    async fn delete_post(&self, id: i32) -> Result<(), PersistenceError> {
        let removed_comments = self
            .pool
            .run(move |conn| {
                conn.immediate_transaction::<_, PersistenceError, _>(|tx| {
                    let removed =
                        diesel::delete(comments::table.filter(comments::post_id.eq(id)))
                            .execute(tx)?;
                    let deleted = diesel::delete(posts::table.find(id)).execute(tx)?;
                    if deleted == 0 {
                        return Err(PersistenceError::not_found(format!("post {id} not found")));
                    }
                    Ok(removed)
                })
            })
            .await?;
        debug!(post_id = id, removed_comments, "post deleted");
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for DieselBlogStore {
    async fn save_comment(&self, draft: &CommentDraft) -> Result<Comment, PersistenceError> {
        let owned = draft.clone();
        self.pool
            .run(move |conn| {
                diesel::insert_into(comments::table)
                    .values(NewCommentRow::from(&owned))
                    .returning(CommentRow::as_returning())
                    .get_result::<CommentRow>(conn)
                    .map(Comment::from)
                    .map_err(PersistenceError::from)
            })
            .await
    }

    async fn get_comment(&self, id: i32) -> Result<Comment, PersistenceError> {
        self.pool
            .run(move |conn| {
                comments::table
                    .find(id)
                    .select(CommentRow::as_select())
                    .first::<CommentRow>(conn)
                    .map(Comment::from)
                    .map_err(not_found_as(format!("comment {id} not found")))
            })
            .await
    }

    async fn get_comments(&self) -> Result<Vec<Comment>, PersistenceError> {
        self.pool
            .run(|conn| {
                comments::table
                    .select(CommentRow::as_select())
                    .order(comments::id.asc())
                    .load::<CommentRow>(conn)
                    .map(|rows| rows.into_iter().map(Comment::from).collect())
                    .map_err(PersistenceError::from)
            })
            .await
    }

    async fn get_comments_by_post_id(
        &self,
        post_id: i32,
    ) -> Result<Vec<Comment>, PersistenceError> {
        self.pool
            .run(move |conn| {
                comments::table
                    .filter(comments::post_id.eq(post_id))
                    .select(CommentRow::as_select())
                    .order(comments::id.asc())
                    .load::<CommentRow>(conn)
                    .map(|rows| rows.into_iter().map(Comment::from).collect())
                    .map_err(PersistenceError::from)
            })
            .await
    }
}
