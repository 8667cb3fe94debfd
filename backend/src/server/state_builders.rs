//! Builders for HTTP state: storage adapters and configured OAuth providers.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use backend::config::{AppConfig, ProviderSecrets};
use backend::domain::IdentityLinkingService;
use backend::domain::ports::{OAuthProvider, OAuthProviders};
use backend::inbound::http::state::HttpState;
use backend::outbound::oauth::{HttpOAuthProvider, OAuthEndpoints};
use backend::outbound::persistence::{DbPool, DieselBlogStore, DieselUserRepository};

/// Timeout applied to every outbound OAuth request.
pub const OAUTH_TIMEOUT: Duration = Duration::from_secs(5);

fn build_provider(
    config: &AppConfig,
    name: &str,
    secrets: &ProviderSecrets,
    endpoints: OAuthEndpoints,
) -> io::Result<Arc<dyn OAuthProvider>> {
    let redirect_url = config
        .redirect_url(name)
        .map_err(|error| io::Error::other(format!("{name} redirect url: {error}")))?;
    let provider = HttpOAuthProvider::new(
        endpoints,
        secrets.to_credentials(),
        redirect_url,
        OAUTH_TIMEOUT,
    )
    .map_err(|error| io::Error::other(format!("build {name} oauth client: {error}")))?;
    info!(provider = name, client_id = secrets.client_id(), "oauth provider enabled");
    Ok(Arc::new(provider))
}

/// Register a provider for every credential block present in `config`.
///
/// # Errors
/// Returns an error when a redirect URL or HTTP client cannot be built.
pub fn build_providers(config: &AppConfig) -> io::Result<OAuthProviders> {
    let mut providers = OAuthProviders::new();
    if let Some(secrets) = config.google_oauth() {
        let endpoints = OAuthEndpoints::google()
            .map_err(|error| io::Error::other(format!("google endpoints: {error}")))?;
        providers =
            providers.with_provider("google", build_provider(config, "google", secrets, endpoints)?);
    }
    if let Some(secrets) = config.facebook_oauth() {
        let endpoints = OAuthEndpoints::facebook()
            .map_err(|error| io::Error::other(format!("facebook endpoints: {error}")))?;
        providers = providers
            .with_provider("facebook", build_provider(config, "facebook", secrets, endpoints)?);
    }
    Ok(providers)
}

/// Wire the Diesel adapters behind the handler ports.
#[must_use]
pub fn build_http_state(pool: &DbPool, providers: OAuthProviders) -> HttpState {
    let store = Arc::new(DieselBlogStore::new(pool.clone()));
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    HttpState::new(
        store.clone(),
        store,
        IdentityLinkingService::new(users),
        providers,
    )
}
