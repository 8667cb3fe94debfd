//! Failure taxonomy shared by the storage ports.

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors raised by post, comment, user and schema storage.
    pub enum PersistenceError {
        /// No row with the requested identity.
        NotFound { message: String } => "{message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "conflict: {message}",
        /// No usable connection to the store.
        Connection { message: String } => "store connection failed: {message}",
        /// The statement failed for any other reason.
        Query { message: String } => "store query failed: {message}",
    }
}

impl From<PersistenceError> for Error {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::NotFound { message } => Self::not_found(message),
            PersistenceError::Conflict { message } => Self::conflict(message),
            other @ (PersistenceError::Connection { .. } | PersistenceError::Query { .. }) => {
                Self::internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(PersistenceError::not_found("post 9 not found"), ErrorCode::NotFound)]
    #[case(PersistenceError::conflict("id 1"), ErrorCode::Conflict)]
    #[case(PersistenceError::connection("pool"), ErrorCode::InternalError)]
    #[case(PersistenceError::query("syntax"), ErrorCode::InternalError)]
    fn maps_to_domain_codes(#[case] error: PersistenceError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[rstest]
    fn not_found_keeps_message() {
        let err = Error::from(PersistenceError::not_found("post 9 not found"));
        assert_eq!(err.message(), "post 9 not found");
    }
}
