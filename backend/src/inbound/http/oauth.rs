//! OAuth authorization-code login.
//!
//! ```text
//! GET /{provider}/login                    302 to the provider consent page
//! GET /{provider}/callback?code=…&state=…  302 to /
//! ```
//!
//! The login route stores a random state token in the session; the callback
//! consumes it and rejects the request unless the returned `state` matches.

use actix_web::{HttpResponse, get, web};
use rand::RngCore;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::ports::OAuthProvider;
use crate::domain::{ApiResult, Error};
use crate::inbound::http::pages::found;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Random bytes in a state token before hex encoding.
pub const STATE_LEN: usize = 32;

/// Query string the provider appends to the callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// State token echoed back by the provider.
    pub state: Option<String>,
    /// Provider error such as `access_denied`.
    pub error: Option<String>,
}

fn generate_state() -> String {
    let mut bytes = [0_u8; STATE_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn lookup(state: &HttpState, name: &str) -> ApiResult<std::sync::Arc<dyn OAuthProvider>> {
    state
        .providers
        .get(name)
        .ok_or_else(|| Error::not_found(format!("unknown login provider: {name}")))
}

/// Redirect to the provider with a fresh state token.
#[get("/{provider}/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let provider = lookup(&state, &name)?;
    let token = generate_state();
    session.store_oauth_state(&token)?;
    Ok(found(&provider.authorization_url(&token)))
}

/// Finish the handshake: check state, exchange the code, link the identity
/// and sign the user in.
#[get("/{provider}/callback")]
pub async fn callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let provider = lookup(&state, &name)?;
    let CallbackQuery {
        code: returned_code,
        state: returned_state,
        error: denial,
    } = query.into_inner();

    let expected = session
        .take_oauth_state()
        .ok_or_else(|| Error::authentication_failed("missing oauth state"))?;
    if returned_state.as_deref() != Some(expected.as_str()) {
        warn!(provider = %name, "oauth state mismatch");
        return Err(Error::authentication_failed("oauth state mismatch"));
    }
    if let Some(reason) = denial {
        return Err(Error::authentication_failed(format!(
            "provider denied the login: {reason}"
        )));
    }
    let code = returned_code
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::authentication_failed("missing authorization code"))?;

    let profile = provider.fetch_profile(&code).await?;
    let user = state.identity.resolve_external_user(&name, &profile).await?;
    session.persist_user(&user)?;
    info!(provider = %name, user_id = user.id, "user signed in");
    Ok(found("/"))
}
