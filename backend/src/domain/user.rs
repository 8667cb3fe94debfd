//! Users and the external identities linked to them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A local user account, created on first OAuth login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned identity.
    pub id: i32,
    /// Email reported by the provider.
    pub email: String,
    /// Display name reported by the provider.
    pub name: String,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDraft {
    /// Explicit identity, if any.
    pub id: Option<i32>,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl UserDraft {
    /// Materialise the draft with the identity chosen by the store.
    #[must_use]
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            email: self.email,
            name: self.name,
        }
    }
}

/// Profile returned by an OAuth provider after a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExternalProfile {
    /// Provider-scoped account id (`id` or `sub`).
    pub external_id: String,
    /// Email, possibly empty when the provider withholds it.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl ExternalProfile {
    /// Draft for the local user created on first login.
    #[must_use]
    pub fn to_user_draft(&self) -> UserDraft {
        UserDraft {
            id: None,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Link between a provider account and a local user.
///
/// At most one link exists per `(provider, external_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Provider name, e.g. `google`.
    pub provider: String,
    /// Provider-scoped account id.
    pub external_id: String,
    /// The linked local user.
    pub user: User,
}

impl ExternalIdentity {
    /// Identity of the linked user.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.user.id
    }
}
