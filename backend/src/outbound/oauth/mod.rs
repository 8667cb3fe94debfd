//! OAuth provider adapters.

mod dto;
mod http_provider;

pub use http_provider::{HttpOAuthProvider, OAuthClientCredentials, OAuthEndpoints};
