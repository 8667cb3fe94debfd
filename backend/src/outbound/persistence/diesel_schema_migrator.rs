//! Embedded migrations for the SQLite schema.

use std::sync::Mutex;

use async_trait::async_trait;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::diesel_blog_store::DieselBlogStore;
use crate::domain::ports::{PersistenceError, SchemaMigrator};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Serialises migration runs within the process.
static MIGRATION_LOCK: Mutex<()> = Mutex::new(());

#[async_trait]
impl SchemaMigrator for DieselBlogStore {
    async fn create_schema(&self) -> Result<(), PersistenceError> {
        let applied = self
            .pool()
            .run(|conn| {
                let _guard = MIGRATION_LOCK
                    .lock()
                    .map_err(|_| PersistenceError::query("migration lock poisoned"))?;
                conn.run_pending_migrations(MIGRATIONS)
                    .map(|versions| versions.len())
                    .map_err(|err| PersistenceError::query(format!("migration failed: {err}")))
            })
            .await?;
        info!(applied, "schema up to date");
        Ok(())
    }
}
