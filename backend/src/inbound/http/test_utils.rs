//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use crate::domain::ports::OAuthProviders;
use crate::domain::{ApiResult, IdentityLinkingService, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryBlogStore;

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation, names the cookie `session` and
/// disables the `Secure` flag for plain HTTP test requests.
#[must_use]
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Route that signs in a fixed user; mount it as `GET /test/login`.
pub async fn test_login(session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist_user(&test_user())?;
    Ok(HttpResponse::Ok().finish())
}

/// User signed in by [`test_login`].
#[must_use]
pub fn test_user() -> User {
    User {
        id: 1,
        email: "ada@example.com".to_owned(),
        name: "Ada".to_owned(),
    }
}

/// Handler state over a fresh in-memory store.
#[must_use]
pub fn memory_state(providers: OAuthProviders) -> (Arc<InMemoryBlogStore>, web::Data<HttpState>) {
    let store = Arc::new(InMemoryBlogStore::new());
    let state = HttpState::new(
        store.clone(),
        store.clone(),
        IdentityLinkingService::new(store.clone()),
        providers,
    );
    (store, web::Data::new(state))
}

/// The `session` cookie set on `res`.
///
/// # Panics
/// Panics when the response does not set the cookie.
#[must_use]
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
