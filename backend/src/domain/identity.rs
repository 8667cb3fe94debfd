//! Resolve OAuth logins to local users.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::ports::UserRepository;
use super::{ApiResult, Error, ExternalProfile, User};

/// Maps `(provider, external_id)` to a single local [`User`].
#[derive(Clone)]
pub struct IdentityLinkingService {
    users: Arc<dyn UserRepository>,
}

impl IdentityLinkingService {
    /// Build the service over a user repository.
    #[must_use]
    pub const fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Return the user linked to the provider account, creating it on first
    /// login. Repeated or concurrent logins resolve to the same user.
    pub async fn resolve_external_user(
        &self,
        provider: &str,
        profile: &ExternalProfile,
    ) -> ApiResult<User> {
        if provider.trim().is_empty() {
            return Err(Error::invalid_request("provider must not be empty")
                .with_details(json!({ "field": "provider" })));
        }
        if profile.external_id.trim().is_empty() {
            return Err(Error::invalid_request("external id must not be empty")
                .with_details(json!({ "field": "externalId" })));
        }
        let user = self.users.link_external_identity(provider, profile).await?;
        debug!(provider, user_id = user.id, "resolved external identity");
        Ok(user)
    }
}

impl std::fmt::Debug for IdentityLinkingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityLinkingService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUserRepository, PersistenceError};
    use mockall::predicate::{eq, function};
    use rstest::{fixture, rstest};

    #[fixture]
    fn profile() -> ExternalProfile {
        ExternalProfile {
            external_id: "1234".to_owned(),
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
        }
    }

    fn ada() -> User {
        User {
            id: 1,
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn delegates_to_repository(profile: ExternalProfile) {
        let mut repo = MockUserRepository::new();
        repo.expect_link_external_identity()
            .with(function(|p: &str| p == "google"), eq(profile.clone()))
            .times(1)
            .return_once(|_, _| Ok(ada()));
        let service = IdentityLinkingService::new(Arc::new(repo));

        let user = service
            .resolve_external_user("google", &profile)
            .await
            .expect("resolve user");
        assert_eq!(user, ada());
    }

    #[rstest]
    #[case("google", "")]
    #[case("google", "   ")]
    #[case("", "1234")]
    #[tokio::test]
    async fn rejects_blank_identifiers(#[case] provider: &str, #[case] external_id: &str) {
        let mut repo = MockUserRepository::new();
        repo.expect_link_external_identity().never();
        let service = IdentityLinkingService::new(Arc::new(repo));
        let profile = ExternalProfile {
            external_id: external_id.to_owned(),
            ..ExternalProfile::default()
        };

        let err = service
            .resolve_external_user(provider, &profile)
            .await
            .expect_err("blank identifiers are rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn store_failures_become_internal_errors(profile: ExternalProfile) {
        let mut repo = MockUserRepository::new();
        repo.expect_link_external_identity()
            .return_once(|_, _| Err(PersistenceError::connection("pool exhausted")));
        let service = IdentityLinkingService::new(Arc::new(repo));

        let err = service
            .resolve_external_user("google", &profile)
            .await
            .expect_err("store failure propagates");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
