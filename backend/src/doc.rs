//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the REST API and health probe paths together with the
//! `Post`, `Comment` and `Error` schemas. The server exposes the document at
//! `/api/v1/openapi.json` and Swagger UI under `/api/v1/swagger/`.

use utoipa::OpenApi;

use crate::domain::{Comment, Error, ErrorCode, Post};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        description = "Read-only access to posts and comments, as JSON or XML."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::api::list_posts,
        crate::inbound::http::api::get_post,
        crate::inbound::http::api::list_post_comments,
        crate::inbound::http::api::list_comments,
        crate::inbound::http::api::get_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Post, Comment, Error, ErrorCode)),
    tags(
        (name = "posts", description = "Blog posts"),
        (name = "comments", description = "Comments on posts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
