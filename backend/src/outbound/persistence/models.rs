//! Diesel row structs. Internal to the persistence adapter.

use diesel::prelude::*;

use super::schema::{comments, external_identities, posts, users};
use crate::domain::{Comment, CommentDraft, ExternalIdentity, Post, PostDraft, User, UserDraft};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct PostRow {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
}

/// `id: None` leaves the column out so SQLite assigns it.
#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub id: Option<i32>,
    pub user_id: i32,
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostUpdate<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CommentRow {
    pub id: i32,
    pub post_id: i32,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Option<i32>,
    pub post_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Option<i32>,
    pub email: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = external_identities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ExternalIdentityRow {
    pub provider: String,
    pub external_id: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = external_identities)]
pub(crate) struct NewExternalIdentityRow<'a> {
    pub provider: &'a str,
    pub external_id: &'a str,
    pub user_id: i32,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            user_id: row.user_id,
            id: row.id,
            title: row.title,
            body: row.body,
        }
    }
}

impl<'a> From<&'a PostDraft> for NewPostRow<'a> {
    fn from(draft: &'a PostDraft) -> Self {
        Self {
            id: draft.id,
            user_id: draft.user_id,
            title: &draft.title,
            body: &draft.body,
        }
    }
}

impl<'a> From<&'a Post> for PostUpdate<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            user_id: post.user_id,
            title: &post.title,
            body: &post.body,
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            post_id: row.post_id,
            id: row.id,
            name: row.name,
            email: row.email,
            body: row.body,
        }
    }
}

impl<'a> From<&'a CommentDraft> for NewCommentRow<'a> {
    fn from(draft: &'a CommentDraft) -> Self {
        Self {
            id: draft.id,
            post_id: draft.post_id,
            name: &draft.name,
            email: &draft.email,
            body: &draft.body,
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
        }
    }
}

impl<'a> From<&'a UserDraft> for NewUserRow<'a> {
    fn from(draft: &'a UserDraft) -> Self {
        Self {
            id: draft.id,
            email: &draft.email,
            name: &draft.name,
        }
    }
}

impl From<(ExternalIdentityRow, UserRow)> for ExternalIdentity {
    fn from((identity, user): (ExternalIdentityRow, UserRow)) -> Self {
        Self {
            provider: identity.provider,
            external_id: identity.external_id,
            user: user.into(),
        }
    }
}
