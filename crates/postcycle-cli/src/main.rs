//! Postcycle - scheduled post lifecycle transitions
//!
//! The `postcycle` command runs the lifecycle pipeline once: it selects posts
//! by tag, and updates those published longer ago than the configured number
//! of days, optionally republishing them or announcing them.
//!
//! Exit status is 0 on success. Any failure, configuration or backend, is
//! reported on stderr and exits with status 1.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use ghost_admin::AdminApiClient;
use postcycle_core::{init_tracing, Orchestrator};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn, Level};

use crate::config::Cli;

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn load_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded local inputs from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => {
            warn!("No env file at {}, using process environment", path.display());
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let mut inputs = cli.inputs();
    if cli.is_local(env_lookup) {
        info!("Running with local config");
        load_env_file(&cli.env_file)?;
        inputs = inputs.overlay_local(env_lookup);
    } else {
        info!("Running as action");
    }

    let config = inputs.resolve().context("Invalid configuration")?;
    debug!(
        api_url = %config.backend.api_url,
        variant = %config.criteria.variant(),
        "Resolved configuration"
    );

    let client =
        AdminApiClient::new(config.backend).context("Failed to create Admin API client")?;
    let orchestrator = Orchestrator::new(Arc::new(client), config.criteria, config.notify);

    let report = orchestrator.run().await.context("Lifecycle run failed")?;
    info!("{}", report.summary());
    if cli.json {
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}
