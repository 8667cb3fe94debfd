//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: SQLite via Diesel
//! - **memory**: in-process store for tests
//! - **oauth**: Google/Facebook authorization-code clients
//! - **seed_source**: jsonplaceholder-shaped HTTP API
//!
//! Adapters translate between wire or row shapes and domain types; they hold
//! no business rules.

mod http_support;
pub mod memory;
pub mod oauth;
pub mod persistence;
pub mod seed_source;
