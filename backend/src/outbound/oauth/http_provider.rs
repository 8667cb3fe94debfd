//! Reqwest-backed OAuth 2.0 authorization-code client.
//!
//! The adapter builds the consent URL, exchanges the returned code at the
//! token endpoint (form POST) and reads the profile from the userinfo
//! endpoint with the bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{TokenResponseDto, UserInfoDto};
use crate::domain::ExternalProfile;
use crate::domain::ports::{OAuthProvider, OAuthProviderError};
use crate::outbound::http_support::status_message;

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const FACEBOOK_AUTHORIZE_URL: &str = "https://www.facebook.com/v3.2/dialog/oauth";
const FACEBOOK_TOKEN_URL: &str = "https://graph.facebook.com/v3.2/oauth/access_token";
const FACEBOOK_USERINFO_URL: &str = "https://graph.facebook.com/v10.0/me?fields=id%2Cname%2Cemail";

/// Provider endpoints and requested scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    /// Consent page.
    pub authorize_url: Url,
    /// Code-for-token exchange.
    pub token_url: Url,
    /// Profile lookup.
    pub userinfo_url: Url,
    /// Scopes joined with spaces in the consent URL.
    pub scopes: Vec<String>,
}

impl OAuthEndpoints {
    fn parse(
        authorize: &str,
        token: &str,
        userinfo: &str,
        scopes: &[&str],
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            authorize_url: Url::parse(authorize)?,
            token_url: Url::parse(token)?,
            userinfo_url: Url::parse(userinfo)?,
            scopes: scopes.iter().map(|scope| (*scope).to_owned()).collect(),
        })
    }

    /// Google with OpenID Connect userinfo.
    ///
    /// # Errors
    /// Only if the built-in URLs fail to parse.
    pub fn google() -> Result<Self, url::ParseError> {
        Self::parse(
            GOOGLE_AUTHORIZE_URL,
            GOOGLE_TOKEN_URL,
            GOOGLE_USERINFO_URL,
            &["openid", "email", "profile"],
        )
    }

    /// Facebook Graph API.
    ///
    /// # Errors
    /// Only if the built-in URLs fail to parse.
    pub fn facebook() -> Result<Self, url::ParseError> {
        Self::parse(
            FACEBOOK_AUTHORIZE_URL,
            FACEBOOK_TOKEN_URL,
            FACEBOOK_USERINFO_URL,
            &["public_profile", "email"],
        )
    }
}

/// Registered application credentials.
#[derive(Clone)]
pub struct OAuthClientCredentials {
    /// Public client id.
    pub client_id: String,
    /// Client secret, wiped on drop.
    pub client_secret: Zeroizing<String>,
}

impl std::fmt::Debug for OAuthClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// OAuth provider reached over HTTPS.
#[derive(Debug)]
pub struct HttpOAuthProvider {
    client: Client,
    endpoints: OAuthEndpoints,
    credentials: OAuthClientCredentials,
    redirect_url: Url,
}

impl HttpOAuthProvider {
    /// Build a provider whose HTTP client gives up after `timeout`.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoints: OAuthEndpoints,
        credentials: OAuthClientCredentials,
        redirect_url: Url,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoints,
            credentials,
            redirect_url,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<String, OAuthProviderError> {
        let response = self
            .client
            .post(self.endpoints.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_url.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_success_body(response).await?;
        let token: TokenResponseDto = serde_json::from_slice(&body).map_err(|error| {
            OAuthProviderError::decode(format!("invalid token response: {error}"))
        })?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl OAuthProvider for HttpOAuthProvider {
    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.endpoints.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("redirect_uri", self.redirect_url.as_str())
            .append_pair("scope", &self.endpoints.scopes.join(" "))
            .append_pair("state", state);
        url.into()
    }

    async fn fetch_profile(&self, code: &str) -> Result<ExternalProfile, OAuthProviderError> {
        let access_token = Zeroizing::new(self.exchange_code(code).await?);
        let response = self
            .client
            .get(self.endpoints.userinfo_url.clone())
            .bearer_auth(access_token.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_success_body(response).await?;
        let profile = parse_profile(&body)?;
        debug!(host = ?self.endpoints.userinfo_url.host_str(), "fetched oauth profile");
        Ok(profile)
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, OAuthProviderError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, &body));
    }
    Ok(body.to_vec())
}

fn parse_profile(body: &[u8]) -> Result<ExternalProfile, OAuthProviderError> {
    let dto: UserInfoDto = serde_json::from_slice(body).map_err(|error| {
        OAuthProviderError::decode(format!("invalid userinfo response: {error}"))
    })?;
    dto.into_profile().map_err(OAuthProviderError::decode)
}

fn map_transport_error(error: reqwest::Error) -> OAuthProviderError {
    if error.is_timeout() {
        OAuthProviderError::timeout(error.to_string())
    } else {
        OAuthProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> OAuthProviderError {
    let message = status_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            OAuthProviderError::timeout(message)
        }
        _ if status.is_client_error() => OAuthProviderError::rejected(message),
        _ => OAuthProviderError::transport(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn google() -> HttpOAuthProvider {
        HttpOAuthProvider::new(
            OAuthEndpoints::google().expect("google endpoints"),
            OAuthClientCredentials {
                client_id: "client-123".to_owned(),
                client_secret: Zeroizing::new("shh".to_owned()),
            },
            Url::parse("http://localhost:8080/google/callback").expect("redirect url"),
            Duration::from_secs(5),
        )
        .expect("build provider")
    }

    #[rstest]
    fn authorization_url_carries_required_parameters(google: HttpOAuthProvider) {
        let url = Url::parse(&google.authorization_url("abc123")).expect("valid url");
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(pairs.get("client_id").map(String::as_str), Some("client-123"));
        assert_eq!(
            pairs.get("redirect_uri").map(String::as_str),
            Some("http://localhost:8080/google/callback")
        );
        assert_eq!(
            pairs.get("scope").map(String::as_str),
            Some("openid email profile")
        );
        assert_eq!(pairs.get("state").map(String::as_str), Some("abc123"));
    }

    #[rstest]
    fn facebook_userinfo_keeps_field_selection() {
        let endpoints = OAuthEndpoints::facebook().expect("facebook endpoints");
        assert_eq!(
            endpoints.userinfo_url.query(),
            Some("fields=id%2Cname%2Cemail")
        );
    }

    #[rstest]
    #[case(r#"{"sub":"g-1","email":"a@b.c","name":"Ann"}"#, "g-1")]
    #[case(r#"{"id":"fb-2","email":"a@b.c","name":"Ann"}"#, "fb-2")]
    #[case(r#"{"id":1234567,"name":"Ann"}"#, "1234567")]
    fn profile_id_comes_from_id_or_sub(#[case] body: &str, #[case] expected: &str) {
        let profile = parse_profile(body.as_bytes()).expect("profile decodes");
        assert_eq!(profile.external_id, expected);
        assert_eq!(profile.name, "Ann");
    }

    #[rstest]
    #[case(r#"{"email":"a@b.c"}"#)]
    #[case("not json")]
    fn unusable_profiles_are_decode_errors(#[case] body: &str) {
        assert!(matches!(
            parse_profile(body.as_bytes()),
            Err(OAuthProviderError::Decode { .. })
        ));
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, "rejected")]
    #[case(StatusCode::UNAUTHORIZED, "rejected")]
    #[case(StatusCode::GATEWAY_TIMEOUT, "timeout")]
    #[case(StatusCode::BAD_GATEWAY, "transport")]
    fn maps_statuses(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"error\":\"invalid_grant\"}");
        let actual = match error {
            OAuthProviderError::Rejected { .. } => "rejected",
            OAuthProviderError::Timeout { .. } => "timeout",
            OAuthProviderError::Transport { .. } => "transport",
            OAuthProviderError::Decode { .. } => "decode",
        };
        assert_eq!(actual, expected);
    }
}
