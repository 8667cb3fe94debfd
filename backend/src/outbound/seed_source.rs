//! Reqwest-backed client for a jsonplaceholder-shaped seed API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::ports::{SeedSource, SeedSourceError};
use crate::domain::{Comment, Post};
use crate::outbound::http_support::status_message;

/// Public instance used when no base URL is configured.
pub const DEFAULT_SEED_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

/// Seed source that issues `GET {base}posts?userId=` and
/// `GET {base}comments?postId=`.
#[derive(Debug, Clone)]
pub struct JsonPlaceholderSource {
    client: Client,
    base_url: Url,
}

impl JsonPlaceholderSource {
    /// Build a source whose HTTP client gives up after `timeout`.
    ///
    /// A trailing slash is added to `base_url` so relative joins keep its path.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, resource: &str) -> Result<Url, SeedSourceError> {
        self.base_url
            .join(resource)
            .map_err(|error| SeedSourceError::transport(format!("invalid seed url: {error}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, i32)],
    ) -> Result<T, SeedSourceError> {
        let url = self.endpoint(resource)?;
        debug!(%url, ?query, "fetching seed data");
        let response = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(SeedSourceError::transport(status_message(status, &body)));
        }
        decode(&body)
    }
}

#[async_trait]
impl SeedSource for JsonPlaceholderSource {
    async fn fetch_posts(&self, user_id: i32) -> Result<Vec<Post>, SeedSourceError> {
        self.get_json("posts", &[("userId", user_id)]).await
    }

    async fn fetch_comments(&self, post_id: i32) -> Result<Vec<Comment>, SeedSourceError> {
        self.get_json("comments", &[("postId", post_id)]).await
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, SeedSourceError> {
    serde_json::from_slice(body)
        .map_err(|error| SeedSourceError::decode(format!("invalid seed JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> SeedSourceError {
    if error.is_timeout() {
        SeedSourceError::timeout(error.to_string())
    } else {
        SeedSourceError::transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn source(base: &str) -> JsonPlaceholderSource {
        JsonPlaceholderSource::new(Url::parse(base).expect("base url"), Duration::from_secs(5))
            .expect("build source")
    }

    #[rstest]
    #[case("https://jsonplaceholder.typicode.com/", "https://jsonplaceholder.typicode.com/posts")]
    #[case("http://localhost:3000/api", "http://localhost:3000/api/posts")]
    fn joins_resources_under_base_path(#[case] base: &str, #[case] expected: &str) {
        let url = source(base).endpoint("posts").expect("join");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn decodes_post_listing() {
        let body = br#"[{"userId":7,"id":61,"title":"t","body":"b"}]"#;
        let posts: Vec<Post> = decode(body).expect("decode posts");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts.first().map(|post| post.id), Some(61));
    }

    #[rstest]
    fn rejects_non_array_payload() {
        let result: Result<Vec<Comment>, _> = decode(br#"{"error":"nope"}"#);
        assert!(matches!(result, Err(SeedSourceError::Decode { .. })));
    }
}
