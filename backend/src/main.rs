//! Blog server entry-point: loads configuration, prepares the database and
//! serves the HTML pages, admin area, OAuth login and REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;
use std::path::PathBuf;

use actix_web::web;
use clap::Parser;
use tracing::info;

use backend::config::{AppConfig, DEFAULT_CONFIG_PATH};
use backend::domain::ports::SchemaMigrator;
use backend::inbound::http::health::HealthState;
use backend::init_tracing;
use backend::outbound::persistence::{DbPool, DieselBlogStore, PoolConfig};

use server::{ServerConfig, build_http_state, build_providers, create_server};

/// `blog` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "blog", about = "Serve the blog over HTTP", version)]
struct CliArgs {
    /// JSON configuration file.
    #[arg(long, value_name = "path", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Listening port; overrides `port` from the configuration file.
    #[arg(long, value_name = "port")]
    port: Option<u16>,
    /// SQLite database file; overrides `database_url` from the configuration file.
    #[arg(long = "database-url", value_name = "path")]
    database_url: Option<String>,
}

fn load_config(args: &CliArgs) -> io::Result<AppConfig> {
    let mut config = AppConfig::load(&args.config).map_err(io::Error::other)?;
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(database_url) = &args.database_url {
        config = config.with_database_url(database_url.clone());
    }
    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = load_config(&args)?;

    let pool = DbPool::new(
        &PoolConfig::new(config.database_url()).with_max_size(config.pool_max_size()),
    )
    .map_err(|error| io::Error::other(format!("open database: {error}")))?;
    DieselBlogStore::new(pool.clone())
        .create_schema()
        .await
        .map_err(|error| io::Error::other(format!("create schema: {error}")))?;

    let providers = build_providers(&config)?;
    let http_state = build_http_state(&pool, providers);
    let server_config = ServerConfig::from_app_config(&config);
    info!(
        bind_addr = %server_config.bind_addr(),
        database_url = config.database_url(),
        "starting blog server"
    );

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, http_state, server_config)?.await
}
