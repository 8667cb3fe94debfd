//! Import seed posts and comments from a jsonplaceholder-shaped API into the
//! blog database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use reqwest::Url;
use tokio::runtime::Builder;
use tracing::info;

use backend::domain::SeedImporter;
use backend::domain::ports::SchemaMigrator;
use backend::init_tracing;
use backend::outbound::persistence::{DbPool, DieselBlogStore, PoolConfig};
use backend::outbound::seed_source::{DEFAULT_SEED_BASE_URL, JsonPlaceholderSource};

/// `seed-import` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-import",
    about = "Import one user's posts and their comments from a seed API",
    version
)]
struct CliArgs {
    /// Base URL of the seed API.
    #[arg(long = "base-url", value_name = "url", default_value = DEFAULT_SEED_BASE_URL)]
    base_url: Url,
    /// Author whose posts are imported.
    #[arg(long = "user-id", value_name = "id", default_value_t = 7)]
    user_id: i32,
    /// SQLite database file.
    #[arg(long = "database-url", value_name = "path", default_value = "storage.db")]
    database_url: String,
    /// Per-request HTTP timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "seconds", default_value_t = 5)]
    timeout_secs: u64,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let args = CliArgs::parse();
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(&args))
}

async fn run(args: &CliArgs) -> Result<()> {
    let pool = DbPool::new(&PoolConfig::new(args.database_url.as_str()))
        .wrap_err_with(|| format!("failed to open database {}", args.database_url))?;
    let store = Arc::new(DieselBlogStore::new(pool));
    store
        .create_schema()
        .await
        .wrap_err("failed to create schema")?;

    let timeout = Duration::from_secs(args.timeout_secs);
    let source = JsonPlaceholderSource::new(args.base_url.clone(), timeout)
        .wrap_err("failed to build seed HTTP client")?;
    let importer = SeedImporter::new(Arc::new(source), store.clone(), store);

    let summary = importer
        .import_user_posts(args.user_id)
        .await
        .wrap_err("seed import failed")?;
    info!(
        base_url = %args.base_url,
        user_id = args.user_id,
        posts_fetched = summary.posts_fetched,
        posts_saved = summary.posts_saved,
        posts_failed = summary.posts_failed,
        comments_saved = summary.comments_saved,
        comments_failed = summary.comments_failed,
        comment_fetches_failed = summary.comment_fetches_failed,
        "seed import finished"
    );
    Ok(())
}
