//! Domain entities, services and ports.
//!
//! Public surface:
//! - `Post`, `Comment`, `User` and their drafts.
//! - `DomainError` (alias `Error`) / `ErrorCode`: transport-agnostic failures.
//! - `IdentityLinkingService`: resolves OAuth logins to local users.
//! - `SeedImporter`: copies a user's posts and comments from a seed source.
//! - `ports`: traits implemented by outbound adapters.

pub mod comment;
pub mod error;
pub mod identity;
pub mod ports;
pub mod post;
pub mod seed_import;
pub mod trace_id;
pub mod user;

pub use self::comment::{Comment, CommentDraft, CommentValidationError};
pub use self::error::{DomainError, Error, ErrorCode};
pub use self::identity::IdentityLinkingService;
pub use self::post::{Post, PostDraft, PostValidationError};
pub use self::seed_import::{ImportSummary, SeedImportError, SeedImporter};
pub use self::trace_id::TraceId;
pub use self::user::{ExternalIdentity, ExternalProfile, User, UserDraft};

/// Result alias for handlers and services.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<i32> {
///     Err(Error::not_found("missing"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
