//! JSON/XML content negotiation for the REST API.
//!
//! Responses are JSON unless the `Accept` header names `text/xml` or
//! `application/xml`.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::domain::{ApiResult, Comment, Error, Post};

const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Whether the client asked for XML.
#[must_use]
pub fn wants_xml(req: &HttpRequest) -> bool {
    req.headers()
        .get_all(header::ACCEPT)
        .filter_map(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase)
        .any(|accept| accept.contains("text/xml") || accept.contains("application/xml"))
}

/// Render `json` as JSON, or `xml` under the `xml_root` element when the
/// client prefers XML.
pub fn respond<J, X>(req: &HttpRequest, json: &J, xml_root: &str, xml: &X) -> ApiResult<HttpResponse>
where
    J: Serialize + ?Sized,
    X: Serialize + ?Sized,
{
    if !wants_xml(req) {
        return Ok(HttpResponse::Ok().json(json));
    }
    let body = quick_xml::se::to_string_with_root(xml_root, xml)
        .map_err(|error| Error::internal(format!("failed to render XML: {error}")))?;
    Ok(HttpResponse::Ok()
        .content_type(XML_CONTENT_TYPE)
        .body(format!("{XML_DECLARATION}{body}")))
}

/// `<posts><post>…</post></posts>`
#[derive(Debug, Serialize)]
pub struct PostsXml<'a> {
    /// One `<post>` element per entry.
    pub post: &'a [Post],
}

/// `<comments><comment>…</comment></comments>`
#[derive(Debug, Serialize)]
pub struct CommentsXml<'a> {
    /// One `<comment>` element per entry.
    pub comment: &'a [Comment],
}
