//! Public HTML pages.
//!
//! ```text
//! GET /
//! GET /{postid}
//! ```

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, web};

use crate::domain::ApiResult;
use crate::inbound::http::session::{SessionContext, SessionUser};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{Layout, render_index, render_post};

/// `200 OK` with an HTML body.
pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

/// `302 Found` pointing at `location`.
pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Render `page` with the chrome for the current visitor.
pub(crate) fn with_layout<F>(state: &HttpState, user: Option<&SessionUser>, page: F) -> String
where
    F: FnOnce(Layout<'_>) -> String,
{
    let providers: Vec<&str> = state.providers.names().collect();
    page(Layout {
        user,
        providers: &providers,
    })
}

/// Index page listing every post.
#[get("/")]
pub async fn index(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let posts = state.posts.get_posts().await?;
    let user = session.user();
    Ok(html(with_layout(&state, user.as_ref(), |layout| {
        render_index(layout, &posts)
    })))
}

/// A single post with its comments.
#[get("/{postid}")]
pub async fn show_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state.posts.get_post(post_id).await?;
    let comments = state.comments.get_comments_by_post_id(post_id).await?;
    let user = session.user();
    Ok(html(with_layout(&state, user.as_ref(), |layout| {
        render_post(layout, &post, &comments)
    })))
}

/// Browsers ask for a favicon on every page; answer without content.
#[get("/favicon.ico")]
pub async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
