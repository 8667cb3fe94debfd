//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! the signed-in user and the pending OAuth state token.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Error, User};

pub(crate) const USER_KEY: &str = "user";
pub(crate) const OAUTH_STATE_KEY: &str = "oauth_state";

/// User record carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Local user id.
    pub id: i32,
    /// Email used to prefill comment forms.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember `user` as the signed-in user.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0
            .insert(USER_KEY, SessionUser::from(user))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in user, if any. An undecodable record counts as absent.
    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.0.get::<SessionUser>(USER_KEY).unwrap_or_else(|error| {
            warn!(%error, "invalid user record in session cookie");
            None
        })
    }

    /// Require a signed-in user or return `403 Forbidden`.
    pub fn require_user(&self) -> Result<SessionUser, Error> {
        self.user()
            .ok_or_else(|| Error::forbidden("login required"))
    }

    /// Store the state token sent with an OAuth authorization redirect.
    pub fn store_oauth_state(&self, state: &str) -> Result<(), Error> {
        self.0
            .insert(OAUTH_STATE_KEY, state)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remove and return the pending OAuth state token.
    #[must_use]
    pub fn take_oauth_state(&self) -> Option<String> {
        self.0.remove_as::<String>(OAUTH_STATE_KEY)?.map_or_else(
            |raw| {
                warn!(raw_len = raw.len(), "invalid oauth state in session cookie");
                None
            },
            Some,
        )
    }

    /// Drop every session entry and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Self::new) })
    }
}

/// Extractor for routes that need a signed-in user; rejects with `403`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(
    /// The user stored at sign-in.
    pub SessionUser,
);

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = fut.await?;
            session
                .require_user()
                .map(Self)
                .map_err(actix_web::Error::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/login",
                web::get().to(|session: SessionContext| async move {
                    let user = User {
                        id: 4,
                        email: "ada@example.com".to_owned(),
                        name: "Ada".to_owned(),
                    };
                    session.persist_user(&user)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/me",
                web::get().to(|user: AuthenticatedUser| async move {
                    HttpResponse::Ok().body(user.0.name)
                }),
            )
            .route(
                "/state",
                web::get().to(|session: SessionContext| async move {
                    session.store_oauth_state("abc123")?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/take",
                web::get().to(|session: SessionContext| async move {
                    let first = session.take_oauth_state().unwrap_or_default();
                    let second = session.take_oauth_state().unwrap_or_default();
                    HttpResponse::Ok().body(format!("{first}|{second}"))
                }),
            )
            .route(
                "/signout",
                web::get().to(|session: SessionContext| async move {
                    session.clear();
                    HttpResponse::Ok()
                }),
            )
    }

    #[actix_web::test]
    async fn round_trips_user() {
        let app = test::init_service(session_test_app()).await;
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        assert_eq!(login.status(), StatusCode::OK);
        let cookie = session_cookie(&login);

        let me = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(test::read_body(me).await, "Ada");
    }

    #[actix_web::test]
    async fn missing_user_is_forbidden() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn tampered_cookie_is_forbidden() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/me")
                .cookie(Cookie::new("session", "not-a-valid-cookie"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn oauth_state_is_taken_once() {
        let app = test::init_service(session_test_app()).await;
        let stored = test::call_service(&app, test::TestRequest::get().uri("/state").to_request()).await;
        let cookie = session_cookie(&stored);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/take").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "abc123|");
    }

    #[actix_web::test]
    async fn signout_expires_the_cookie() {
        let app = test::init_service(session_test_app()).await;
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&login);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/signout").cookie(cookie).to_request(),
        )
        .await;
        let removal = session_cookie(&res);
        assert_eq!(removal.value(), "");
    }
}
