//! Translate pool and Diesel failures into [`PersistenceError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::PersistenceError;

impl From<PoolError> for PersistenceError {
    fn from(error: PoolError) -> Self {
        debug!(%error, "sqlite pool failure");
        Self::connection(error.to_string())
    }
}

impl From<DieselError> for PersistenceError {
    fn from(error: DieselError) -> Self {
        map_diesel_error(error)
    }
}

/// Map a Diesel error. `NotFound` keeps a generic message; callers that know
/// the entity use [`not_found_as`] instead.
pub(crate) fn map_diesel_error(error: DieselError) -> PersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => PersistenceError::not_found("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            PersistenceError::conflict(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            PersistenceError::query("referenced record does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::connection("database connection closed")
        }
        DieselError::DatabaseError(_, info) => PersistenceError::query(info.message().to_owned()),
        DieselError::QueryBuilderError(_) => PersistenceError::query("database query error"),
        _ => PersistenceError::query("database error"),
    }
}

/// Like [`map_diesel_error`], but `NotFound` carries `message`.
pub(crate) fn not_found_as(message: impl Into<String>) -> impl FnOnce(DieselError) -> PersistenceError {
    let text: String = message.into();
    move |error| match error {
        DieselError::NotFound => PersistenceError::not_found(text),
        other => map_diesel_error(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct Info(&'static str);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(message)))
    }

    #[rstest]
    fn unique_violation_is_conflict() {
        let mapped = map_diesel_error(db_error(
            DatabaseErrorKind::UniqueViolation,
            "UNIQUE constraint failed: posts.id",
        ));
        assert_eq!(
            mapped,
            PersistenceError::conflict("UNIQUE constraint failed: posts.id")
        );
    }

    #[rstest]
    fn foreign_key_violation_is_query_error() {
        let mapped = map_diesel_error(db_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "FOREIGN KEY constraint failed",
        ));
        assert!(matches!(mapped, PersistenceError::Query { .. }));
    }

    #[rstest]
    fn not_found_uses_supplied_message() {
        let mapped = not_found_as("post 3 not found")(DieselError::NotFound);
        assert_eq!(mapped, PersistenceError::not_found("post 3 not found"));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let mapped = PersistenceError::from(PoolError::checkout("timed out"));
        assert!(matches!(mapped, PersistenceError::Connection { .. }));
    }
}
