//! Port for bringing the store's schema up to date.

use async_trait::async_trait;

use super::PersistenceError;

/// Creates missing tables. Running it again leaves existing rows untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaMigrator: Send + Sync {
    /// Apply pending migrations.
    async fn create_schema(&self) -> Result<(), PersistenceError>;
}
