//! Driven ports of the domain.
//!
//! Each port is an async trait implemented by an outbound adapter. Storage
//! ports share [`PersistenceError`]; the HTTP clients have their own
//! `define_port_error!` enums.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod oauth_provider;
mod persistence_error;
mod post_repository;
mod schema_migrator;
mod seed_source;
mod user_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::CommentRepository;
#[cfg(test)]
pub use oauth_provider::MockOAuthProvider;
pub use oauth_provider::{OAuthProvider, OAuthProviderError, OAuthProviders};
pub use persistence_error::PersistenceError;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::PostRepository;
#[cfg(test)]
pub use schema_migrator::MockSchemaMigrator;
pub use schema_migrator::SchemaMigrator;
#[cfg(test)]
pub use seed_source::MockSeedSource;
pub use seed_source::{SeedSource, SeedSourceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
