//! Admin area: post and comment mutations for signed-in users.
//!
//! ```text
//! GET  /admin/createpost
//! POST /admin/createpost            title=…&body=…
//! GET  /admin/{postid}/editpost
//! POST /admin/{postid}/editpost     title=…&body=…
//! POST /admin/{postid}/addcomment   name=…&email=…&body=…
//! GET  /admin/{postid}/deletepost
//! GET  /admin/signout
//! ```
//!
//! Every route extracts [`AuthenticatedUser`], so anonymous requests get
//! `403 Forbidden` before any handler runs. Mutations answer `302 Found`.

use actix_web::{HttpResponse, Scope, get, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domain::{
    ApiResult, CommentDraft, CommentValidationError, Error, PostDraft, PostValidationError,
};
use crate::inbound::http::pages::{found, html, with_layout};
use crate::inbound::http::session::{AuthenticatedUser, SessionContext};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::render_post_form;

/// Form body for creating or editing a post.
#[derive(Debug, Deserialize)]
pub struct PostForm {
    /// Post title; must not be blank.
    #[serde(default)]
    pub title: String,
    /// Post body; must not be blank.
    #[serde(default)]
    pub body: String,
}

/// Form body for adding a comment.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    /// Commenter's display name.
    #[serde(default)]
    pub name: String,
    /// Commenter's email address.
    #[serde(default)]
    pub email: String,
    /// Comment text.
    #[serde(default)]
    pub body: String,
}

/// Every admin route under `/admin`.
#[must_use]
pub fn admin_scope() -> Scope {
    web::scope("/admin")
        .service(create_post_form)
        .service(create_post)
        .service(sign_out)
        .service(edit_post_form)
        .service(edit_post)
        .service(add_comment)
        .service(delete_post)
}

fn map_post_validation_error(err: PostValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

fn map_comment_validation_error(err: CommentValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

/// Empty post form.
#[get("/createpost")]
pub async fn create_post_form(
    state: web::Data<HttpState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> HttpResponse {
    html(with_layout(&state, Some(&user), |layout| {
        render_post_form(layout, "/admin/createpost", None)
    }))
}

/// Save a new post owned by the signed-in user.
#[post("/createpost")]
pub async fn create_post(
    state: web::Data<HttpState>,
    AuthenticatedUser(user): AuthenticatedUser,
    form: web::Form<PostForm>,
) -> ApiResult<HttpResponse> {
    let PostForm { title, body } = form.into_inner();
    let draft = PostDraft::try_new(user.id, title, body).map_err(map_post_validation_error)?;
    let post = state.posts.save_post(&draft).await?;
    info!(post_id = post.id, user_id = user.id, "post created");
    Ok(found("/"))
}

/// Post form prefilled with the stored post.
#[get("/{postid}/editpost")]
pub async fn edit_post_form(
    state: web::Data<HttpState>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;
    let action = format!("/admin/{}/editpost", post.id);
    Ok(html(with_layout(&state, Some(&user), |layout| {
        render_post_form(layout, &action, Some(&post))
    })))
}

/// Replace a post's title and body, keeping its author.
#[post("/{postid}/editpost")]
pub async fn edit_post(
    state: web::Data<HttpState>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: web::Path<i32>,
    form: web::Form<PostForm>,
) -> ApiResult<HttpResponse> {
    let existing = state.posts.get_post(path.into_inner()).await?;
    let PostForm { title, body } = form.into_inner();
    let draft =
        PostDraft::try_new(existing.user_id, title, body).map_err(map_post_validation_error)?;
    let post = state
        .posts
        .update_post(&draft.into_post(existing.id))
        .await?;
    info!(post_id = post.id, user_id = user.id, "post updated");
    Ok(found(&format!("/{}", post.id)))
}

/// Add a comment to an existing post.
#[post("/{postid}/addcomment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: web::Path<i32>,
    form: web::Form<CommentForm>,
) -> ApiResult<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;
    let CommentForm { name, email, body } = form.into_inner();
    let draft = CommentDraft::try_new(post.id, name, email, body)
        .map_err(map_comment_validation_error)?;
    let comment = state.comments.save_comment(&draft).await?;
    info!(post_id = post.id, comment_id = comment.id, user_id = user.id, "comment added");
    Ok(found(&format!("/{}", post.id)))
}

/// Delete a post together with its comments.
#[get("/{postid}/deletepost")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let post_id = path.into_inner();
    state.posts.delete_post(post_id).await?;
    info!(post_id, user_id = user.id, "post deleted");
    Ok(found("/"))
}

/// End the session.
#[get("/signout")]
pub async fn sign_out(
    AuthenticatedUser(user): AuthenticatedUser,
    session: SessionContext,
) -> HttpResponse {
    session.clear();
    info!(user_id = user.id, "signed out");
    found("/")
}
