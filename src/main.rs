use anyhow::Result;
use std::io;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use services::{glacier_service::GlacierService, s3_storage::S3Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Parse config ---
    let cfg = config::AppConfig::from_args()?;

    // --- Logging setup (stderr, so stdout only carries status lines) ---
    let default_level = if cfg.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    tracing::debug!("Starting glacier-restore with config: {:?}", cfg);

    // --- Initialize storage client ---
    let storage = S3Storage::connect(&cfg.client).await;
    let service = GlacierService::new(storage);

    // --- Run command ---
    let mut out = io::stdout().lock();
    handlers::dispatch(&service, &cfg.scope, &cfg.command, &mut out).await
}
