//! Port for users and their external identities.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{ExternalIdentity, ExternalProfile, User, UserDraft};

/// User storage used by identity linking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user.
    async fn save_user(&self, draft: &UserDraft) -> Result<User, PersistenceError>;

    /// Fetch a user by id.
    async fn find_user(&self, id: i32) -> Result<Option<User>, PersistenceError>;

    /// Look up the link for a provider account, with its user loaded.
    async fn find_external_identity(
        &self,
        provider: &str,
        external_id: &str,
    ) -> Result<Option<ExternalIdentity>, PersistenceError>;

    /// Return the user linked to `(provider, profile.external_id)`, creating
    /// the user and the link when none exists.
    ///
    /// Concurrent calls for the same account must agree on one user.
    async fn link_external_identity(
        &self,
        provider: &str,
        profile: &ExternalProfile,
    ) -> Result<User, PersistenceError>;
}
