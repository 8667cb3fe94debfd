//! In-process store with the same contract as the SQLite adapter.
//!
//! Used by tests and by the HTTP end-to-end suite. One mutex guards all
//! tables, so every operation (identity linking included) is atomic.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CommentRepository, PersistenceError, PostRepository, SchemaMigrator, UserRepository,
};
use crate::domain::{
    Comment, CommentDraft, ExternalIdentity, ExternalProfile, Post, PostDraft, User, UserDraft,
};

#[derive(Debug, Default)]
struct Tables {
    posts: BTreeMap<i32, Post>,
    comments: BTreeMap<i32, Comment>,
    users: BTreeMap<i32, User>,
    identities: HashMap<(String, String), i32>,
    last_post_id: i32,
    last_comment_id: i32,
    last_user_id: i32,
}

/// Assign `requested` or the next id after `last`, as SQLite AUTOINCREMENT does.
fn assign_id<V>(
    rows: &BTreeMap<i32, V>,
    last: &mut i32,
    requested: Option<i32>,
    entity: &str,
) -> Result<i32, PersistenceError> {
    let id = requested.map_or_else(
        || {
            last.checked_add(1).ok_or_else(|| {
                PersistenceError::query(format!("{entity}.id sequence exhausted"))
            })
        },
        Ok,
    )?;
    if rows.contains_key(&id) {
        return Err(PersistenceError::conflict(format!(
            "UNIQUE constraint failed: {entity}.id"
        )));
    }
    *last = (*last).max(id);
    Ok(id)
}

impl Tables {
    fn insert_user(&mut self, draft: UserDraft) -> Result<User, PersistenceError> {
        let id = assign_id(&self.users, &mut self.last_user_id, draft.id, "users")?;
        let user = draft.into_user(id);
        self.users.insert(id, user.clone());
        Ok(user)
    }
}

/// Mutex-guarded maps implementing every storage port.
#[derive(Debug, Default)]
pub struct InMemoryBlogStore {
    tables: Mutex<Tables>,
}

impl InMemoryBlogStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, PersistenceError> {
        self.tables
            .lock()
            .map_err(|_| PersistenceError::connection("in-memory store lock poisoned"))
    }

    /// Number of stored identity links.
    #[must_use]
    pub fn identity_count(&self) -> usize {
        self.lock().map_or(0, |tables| tables.identities.len())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn save_post(&self, draft: &PostDraft) -> Result<Post, PersistenceError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        let id = assign_id(&tables.posts, &mut tables.last_post_id, draft.id, "posts")?;
        let post = draft.clone().into_post(id);
        tables.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i32) -> Result<Post, PersistenceError> {
        self.lock()?
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| PersistenceError::not_found(format!("post {id} not found")))
    }

    async fn get_posts(&self) -> Result<Vec<Post>, PersistenceError> {
        Ok(self.lock()?.posts.values().cloned().collect())
    }

    async fn update_post(&self, post: &Post) -> Result<Post, PersistenceError> {
        let mut tables = self.lock()?;
        let stored = tables
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| PersistenceError::not_found(format!("post {} not found", post.id)))?;
        stored.clone_from(post);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i32) -> Result<(), PersistenceError> {
        let mut tables = self.lock()?;
        if tables.posts.remove(&id).is_none() {
            return Err(PersistenceError::not_found(format!("post {id} not found")));
        }
        tables.comments.retain(|_, comment| comment.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn save_comment(&self, draft: &CommentDraft) -> Result<Comment, PersistenceError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        if !tables.posts.contains_key(&draft.post_id) {
            return Err(PersistenceError::query("referenced record does not exist"));
        }
        let id = assign_id(
            &tables.comments,
            &mut tables.last_comment_id,
            draft.id,
            "comments",
        )?;
        let comment = draft.clone().into_comment(id);
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: i32) -> Result<Comment, PersistenceError> {
        self.lock()?
            .comments
            .get(&id)
            .cloned()
            .ok_or_else(|| PersistenceError::not_found(format!("comment {id} not found")))
    }

    async fn get_comments(&self) -> Result<Vec<Comment>, PersistenceError> {
        Ok(self.lock()?.comments.values().cloned().collect())
    }

    async fn get_comments_by_post_id(
        &self,
        post_id: i32,
    ) -> Result<Vec<Comment>, PersistenceError> {
        Ok(self
            .lock()?
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn save_user(&self, draft: &UserDraft) -> Result<User, PersistenceError> {
        self.lock()?.insert_user(draft.clone())
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, PersistenceError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn find_external_identity(
        &self,
        provider: &str,
        external_id: &str,
    ) -> Result<Option<ExternalIdentity>, PersistenceError> {
        let tables = self.lock()?;
        let key = (provider.to_owned(), external_id.to_owned());
        Ok(tables
            .identities
            .get(&key)
            .and_then(|user_id| tables.users.get(user_id))
            .map(|user| ExternalIdentity {
                provider: key.0.clone(),
                external_id: key.1.clone(),
                user: user.clone(),
            }))
    }

    async fn link_external_identity(
        &self,
        provider: &str,
        profile: &ExternalProfile,
    ) -> Result<User, PersistenceError> {
        let mut tables = self.lock()?;
        let key = (provider.to_owned(), profile.external_id.clone());
        if let Some(user) = tables
            .identities
            .get(&key)
            .and_then(|user_id| tables.users.get(user_id))
        {
            return Ok(user.clone());
        }
        let user = tables.insert_user(profile.to_user_draft())?;
        tables.identities.insert(key, user.id);
        Ok(user)
    }
}

#[async_trait]
impl SchemaMigrator for InMemoryBlogStore {
    async fn create_schema(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
