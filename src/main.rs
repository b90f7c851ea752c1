//! Redirect mapper service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request            ┌──────────────────────────────────────────┐
//!     ──────────────────────────┼─▶ http server ──▶ routing (live RuleSet) │
//!                               │        │                ▲                │
//!     301/302/.. or 404         │        ▼                │ swap           │
//!     ◀─────────────────────────┼── response          Redirector ◀── admin │◀── Admin API
//!                               │                         │                │
//!                               │                         ▼                │
//!                               │                   storage (JSON file)    │
//!                               └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use redirect_mapper::config::{load_config, RedirectConfig};
use redirect_mapper::lifecycle::{self, signals};
use redirect_mapper::observability::logging;

#[derive(Parser)]
#[command(name = "redirect-mapper")]
#[command(about = "Redirects not-found paths to mapped destinations", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RedirectConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "redirect-mapper starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rules_path = ?config.rules.path,
        redirect_status = config.redirect.status,
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    let running = match lifecycle::start(config).await {
        Ok(running) => running,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    tracing::info!(address = %running.front_addr, "Listening for connections");

    signals::wait_for_signal().await;
    running.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
