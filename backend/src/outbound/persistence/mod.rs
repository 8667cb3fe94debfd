//! SQLite persistence adapters built on Diesel.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay inside
//! this module; the domain only sees the port traits.
//!
//! ```no_run
//! use backend::domain::ports::{PostRepository, SchemaMigrator};
//! use backend::outbound::persistence::{DbPool, DieselBlogStore, PoolConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(&PoolConfig::new("storage.db"))?;
//! let store = DieselBlogStore::new(pool);
//! store.create_schema().await?;
//! let posts = store.get_posts().await?;
//! # Ok(()) }
//! ```

mod diesel_basic_error_mapping;
mod diesel_blog_store;
mod diesel_schema_migrator;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_blog_store::DieselBlogStore;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
