//! Diesel-backed users and external identity links.
//!
//! Linking runs the lookup and both inserts inside `BEGIN IMMEDIATE`, so two
//! logins for the same account cannot interleave. The composite primary key
//! on `external_identities` is the backstop: a loser that still hits a unique
//! violation re-reads the winner's link.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info};

use super::models::{ExternalIdentityRow, NewExternalIdentityRow, NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{external_identities, users};
use crate::domain::ports::{PersistenceError, UserRepository};
use crate::domain::{ExternalIdentity, ExternalProfile, User, UserDraft};

/// SQLite user repository.
#[derive(Clone, Debug)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn linked_user(
    conn: &mut SqliteConnection,
    provider: &str,
    external_id: &str,
) -> QueryResult<Option<UserRow>> {
    external_identities::table
        .inner_join(users::table)
        .filter(external_identities::provider.eq(provider))
        .filter(external_identities::external_id.eq(external_id))
        .select(UserRow::as_select())
        .first::<UserRow>(conn)
        .optional()
}

fn create_linked_user(
    conn: &mut SqliteConnection,
    provider: &str,
    profile: &ExternalProfile,
) -> QueryResult<(UserRow, bool)> {
    conn.immediate_transaction(|tx| {
        if let Some(existing) = linked_user(tx, provider, &profile.external_id)? {
            return Ok((existing, false));
        }
        let draft = profile.to_user_draft();
        let user = diesel::insert_into(users::table)
            .values(NewUserRow::from(&draft))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(tx)?;
        diesel::insert_into(external_identities::table)
            .values(NewExternalIdentityRow {
                provider,
                external_id: &profile.external_id,
                user_id: user.id,
            })
            .execute(tx)?;
        Ok((user, true))
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn save_user(&self, draft: &UserDraft) -> Result<User, PersistenceError> {
        let owned = draft.clone();
        self.pool
            .run(move |conn| {
                diesel::insert_into(users::table)
                    .values(NewUserRow::from(&owned))
                    .returning(UserRow::as_returning())
                    .get_result::<UserRow>(conn)
                    .map(User::from)
                    .map_err(PersistenceError::from)
            })
            .await
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, PersistenceError> {
        self.pool
            .run(move |conn| {
                users::table
                    .find(id)
                    .select(UserRow::as_select())
                    .first::<UserRow>(conn)
                    .optional()
                    .map(|row| row.map(User::from))
                    .map_err(PersistenceError::from)
            })
            .await
    }

    async fn find_external_identity(
        &self,
        provider: &str,
        external_id: &str,
    ) -> Result<Option<ExternalIdentity>, PersistenceError> {
        let (provider_key, external_key) = (provider.to_owned(), external_id.to_owned());
        self.pool
            .run(move |conn| {
                external_identities::table
                    .inner_join(users::table)
                    .filter(external_identities::provider.eq(provider_key.as_str()))
                    .filter(external_identities::external_id.eq(external_key.as_str()))
                    .select((ExternalIdentityRow::as_select(), UserRow::as_select()))
                    .first::<(ExternalIdentityRow, UserRow)>(conn)
                    .optional()
                    .map(|found| found.map(ExternalIdentity::from))
                    .map_err(PersistenceError::from)
            })
            .await
    }

    async fn link_external_identity(
        &self,
        provider: &str,
        profile: &ExternalProfile,
    ) -> Result<User, PersistenceError> {
        let provider_name = provider.to_owned();
        let login = profile.clone();
        self.pool
            .run(move |conn| {
                match create_linked_user(conn, &provider_name, &login) {
                    Ok((user, created)) => {
                        if created {
                            info!(provider = %provider_name, user_id = user.id, "linked new external identity");
                        }
                        Ok(user.into())
                    }
                    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                        debug!(provider = %provider_name, "identity linked concurrently, re-reading");
                        linked_user(conn, &provider_name, &login.external_id)?
                            .map(User::from)
                            .ok_or_else(|| {
                                PersistenceError::query("identity link vanished after conflict")
                            })
                    }
                    Err(other) => Err(other.into()),
                }
            })
            .await
    }
}
