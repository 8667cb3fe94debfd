//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::IdentityLinkingService;
use crate::domain::ports::{CommentRepository, OAuthProviders, PostRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Post storage.
    pub posts: Arc<dyn PostRepository>,
    /// Comment storage.
    pub comments: Arc<dyn CommentRepository>,
    /// Maps OAuth identities to local users.
    pub identity: IdentityLinkingService,
    /// Configured OAuth providers keyed by name.
    pub providers: OAuthProviders,
}

impl HttpState {
    /// Bundle the ports used by the page, admin, API and OAuth handlers.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use backend::domain::IdentityLinkingService;
    /// use backend::domain::ports::OAuthProviders;
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryBlogStore;
    ///
    /// let store = Arc::new(InMemoryBlogStore::new());
    /// let state = HttpState::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     IdentityLinkingService::new(store),
    ///     OAuthProviders::new(),
    /// );
    /// assert_eq!(state.providers.names().count(), 0);
    /// ```
    #[must_use]
    pub const fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        identity: IdentityLinkingService,
        providers: OAuthProviders,
    ) -> Self {
        Self {
            posts,
            comments,
            identity,
            providers,
        }
    }
}

impl std::fmt::Debug for HttpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpState")
            .field("providers", &self.providers)
            .finish_non_exhaustive()
    }
}
