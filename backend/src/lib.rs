//! Blog backend library modules.
//!
//! Posts and comments live in SQLite behind domain ports. The HTTP adapters
//! serve HTML pages, a JSON/XML REST API and an OAuth-gated admin area; the
//! `seed-import` binary fills the store from a jsonplaceholder-shaped API.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
/// Public alias for the domain error used across the crate.
pub use domain::Error;
pub use domain::TraceId;
pub use middleware::Trace;

/// Install the JSON `tracing` subscriber shared by every binary.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Calling this
/// twice keeps the first subscriber and logs a warning.
pub fn init_tracing() {
    use tracing::warn;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(error) = fmt().json().with_env_filter(filter).try_init() {
        warn!(%error, "tracing subscriber already installed");
    }
}
