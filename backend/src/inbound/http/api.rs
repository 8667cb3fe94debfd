//! Read-only REST API over posts and comments.
//!
//! ```text
//! GET /api/v1/posts
//! GET /api/v1/posts/{id}
//! GET /api/v1/posts/{id}/comments
//! GET /api/v1/comments
//! GET /api/v1/comments/{id}
//! ```
//!
//! Responses are JSON unless the client sends `Accept: text/xml` or
//! `Accept: application/xml`.

use actix_web::{HttpRequest, HttpResponse, Scope, get, web};

use crate::domain::{ApiResult, Comment, Error, Post};
use crate::inbound::http::error::unparseable_path_as_not_found;
use crate::inbound::http::negotiate::{CommentsXml, PostsXml, respond};
use crate::inbound::http::state::HttpState;

/// Every API route under `/api/v1`.
#[must_use]
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(unparseable_path_as_not_found())
        .service(list_posts)
        .service(get_post)
        .service(list_post_comments)
        .service(list_comments)
        .service(get_comment)
}

/// List every post ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "Posts", body = [Post]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(req: HttpRequest, state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let posts = state.posts.get_posts().await?;
    respond(&req, &posts, "posts", &PostsXml { post: &posts })
}

/// Fetch one post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = i32, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;
    respond(&req, &post, "post", &post)
}

/// List the comments attached to one post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = i32, Path, description = "Post id")),
    responses(
        (status = 200, description = "Comments on the post", body = [Comment]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listPostComments"
)]
#[get("/posts/{id}/comments")]
pub async fn list_post_comments(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let comments = state
        .comments
        .get_comments_by_post_id(path.into_inner())
        .await?;
    respond(&req, &comments, "comments", &CommentsXml { comment: &comments })
}

/// List every comment ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/comments",
    responses(
        (status = 200, description = "Comments", body = [Comment]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/comments")]
pub async fn list_comments(
    req: HttpRequest,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let comments = state.comments.get_comments().await?;
    respond(&req, &comments, "comments", &CommentsXml { comment: &comments })
}

/// Fetch one comment.
#[utoipa::path(
    get,
    path = "/api/v1/comments/{id}",
    params(("id" = i32, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["comments"],
    operation_id = "getComment"
)]
#[get("/comments/{id}")]
pub async fn get_comment(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let comment = state.comments.get_comment(path.into_inner()).await?;
    respond(&req, &comment, "comment", &comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ports::{
        CommentRepository, MockCommentRepository, MockPostRepository, OAuthProviders,
        PersistenceError, PostRepository,
    };
    use crate::domain::{CommentDraft, IdentityLinkingService, PostDraft};
    use crate::inbound::http::test_utils::memory_state;
    use crate::outbound::memory::InMemoryBlogStore;

    #[actix_web::test]
    async fn missing_post_is_json_not_found() {
        let (_store, state) = memory_state(OAuthProviders::new());
        let app = test::init_service(App::new().app_data(state).service(api_scope())).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/api/v1/posts/999").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
        assert!(body["error"].is_string());
    }

    #[rstest]
    #[case("/api/v1/posts/abc")]
    #[case("/api/v1/posts/1.5/comments")]
    #[case("/api/v1/comments/xyz")]
    #[actix_rt::test]
    async fn non_numeric_ids_are_json_not_found(#[case] uri: &str) {
        let (_store, state) = memory_state(OAuthProviders::new());
        let app = test::init_service(App::new().app_data(state).service(api_scope())).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["error"], format!("no record at {uri}"));
    }

    #[actix_web::test]
    async fn post_comments_are_filtered_and_negotiated() {
        let (store, state) = memory_state(OAuthProviders::new());
        let post = store
            .save_post(&PostDraft::try_new(7, "t", "b").expect("draft"))
            .await
            .expect("save");
        store
            .save_comment(&CommentDraft::try_new(post.id, "n", "e@x", "hello").expect("draft"))
            .await
            .expect("save comment");
        let app = test::init_service(App::new().app_data(state).service(api_scope())).await;

        let uri = format!("/api/v1/posts/{}/comments", post.id);
        let res = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["postId"], post.id);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header((header::ACCEPT, "application/xml"))
                .to_request(),
        )
        .await;
        let text = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8");
        assert!(text.contains("<comments><comment>"));
        assert!(text.contains("<body>hello</body>"));

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/v1/posts/404/comments").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, Value::Array(Vec::new()));
    }

    #[actix_web::test]
    async fn store_failures_are_redacted() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_get_posts()
            .returning(|| Err(PersistenceError::connection("database is locked")));
        let users = Arc::new(InMemoryBlogStore::new());
        let state = web::Data::new(HttpState::new(
            Arc::new(posts),
            Arc::new(MockCommentRepository::new()),
            IdentityLinkingService::new(users),
            OAuthProviders::new(),
        ));
        let app = test::init_service(App::new().app_data(state).service(api_scope())).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/v1/posts").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
