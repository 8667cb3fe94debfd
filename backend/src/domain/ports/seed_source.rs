//! Port for the remote API that seed data is imported from.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Comment, Post};

define_port_error! {
    /// Failures while fetching seed data.
    pub enum SeedSourceError {
        /// The request exceeded the client timeout.
        Timeout { message: String } => "seed source timed out: {message}",
        /// Network failure or non-success status.
        Transport { message: String } => "seed source request failed: {message}",
        /// The body was not the expected JSON.
        Decode { message: String } => "seed source payload invalid: {message}",
    }
}

/// Read-only access to a jsonplaceholder-shaped API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Posts written by `user_id`.
    async fn fetch_posts(&self, user_id: i32) -> Result<Vec<Post>, SeedSourceError>;

    /// Comments on `post_id`.
    async fn fetch_comments(&self, post_id: i32) -> Result<Vec<Comment>, SeedSourceError>;
}
