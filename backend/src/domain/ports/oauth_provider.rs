//! Port for OAuth 2.0 authorization-code providers.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Error, ExternalProfile};

define_port_error! {
    /// Failures while exchanging a code for a profile.
    pub enum OAuthProviderError {
        /// The provider did not answer in time.
        Timeout { message: String } => "oauth provider timed out: {message}",
        /// Network or TLS failure.
        Transport { message: String } => "oauth provider unreachable: {message}",
        /// The provider refused the code or token.
        Rejected { message: String } => "oauth provider rejected the request: {message}",
        /// The provider answered with an unusable payload.
        Decode { message: String } => "oauth provider payload invalid: {message}",
    }
}

impl From<OAuthProviderError> for Error {
    fn from(error: OAuthProviderError) -> Self {
        match error {
            OAuthProviderError::Timeout { .. } | OAuthProviderError::Transport { .. } => {
                Self::internal(error.to_string())
            }
            OAuthProviderError::Rejected { .. } | OAuthProviderError::Decode { .. } => {
                Self::authentication_failed(error.to_string())
            }
        }
    }
}

/// One configured identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Consent page URL carrying `state`.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code and fetch the account profile.
    async fn fetch_profile(&self, code: &str) -> Result<ExternalProfile, OAuthProviderError>;
}

/// Configured providers keyed by route name (`google`, `facebook`).
#[derive(Clone, Default)]
pub struct OAuthProviders {
    providers: BTreeMap<String, Arc<dyn OAuthProvider>>,
}

impl OAuthProviders {
    /// Empty registry; every login route answers 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under `name`, replacing any previous entry.
    #[must_use]
    pub fn with_provider(mut self, name: impl Into<String>, provider: Arc<dyn OAuthProvider>) -> Self {
        self.providers.insert(name.into(), provider);
        self
    }

    /// Provider registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn OAuthProvider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for OAuthProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(OAuthProviderError::timeout("5s"), ErrorCode::InternalError)]
    #[case(OAuthProviderError::transport("dns"), ErrorCode::InternalError)]
    #[case(OAuthProviderError::rejected("bad code"), ErrorCode::AuthenticationFailed)]
    #[case(OAuthProviderError::decode("no id"), ErrorCode::AuthenticationFailed)]
    fn maps_to_domain_codes(#[case] error: OAuthProviderError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[rstest]
    fn registry_looks_up_by_name() {
        let providers = OAuthProviders::new()
            .with_provider("google", Arc::new(MockOAuthProvider::new()))
            .with_provider("facebook", Arc::new(MockOAuthProvider::new()));
        assert!(providers.get("google").is_some());
        assert!(providers.get("github").is_none());
        assert_eq!(providers.names().collect::<Vec<_>>(), ["facebook", "google"]);
    }
}
