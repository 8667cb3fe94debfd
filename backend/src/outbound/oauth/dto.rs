//! Wire shapes of the token and userinfo responses.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::ExternalProfile;

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
}

/// Google answers with `sub`, Facebook with `id` (a string, but tolerate
/// numbers).
#[derive(Debug, Deserialize)]
pub(super) struct UserInfoDto {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl UserInfoDto {
    pub(super) fn into_profile(self) -> Result<ExternalProfile, String> {
        let external_id = match (self.id, self.sub) {
            (Some(Value::String(id)), _) => id,
            (Some(Value::Number(id)), _) => id.to_string(),
            (_, Some(sub)) => sub,
            _ => String::new(),
        };
        if external_id.trim().is_empty() {
            return Err("userinfo response carries no account id".to_owned());
        }
        Ok(ExternalProfile {
            external_id,
            email: self.email.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
        })
    }
}
