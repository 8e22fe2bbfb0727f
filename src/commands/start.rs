use anyhow::Result;
use colored::Colorize;
use tracing::info;
use warehouse_rates::{config, server};

/// Execute the start command
///
/// Loads configuration and runs the server in the foreground until a
/// shutdown signal arrives. Process supervision (systemd, containers) is
/// expected to handle backgrounding and restarts.
pub async fn execute() -> Result<()> {
    println!("{}", "Starting Warehouse Rates server...".green());

    // Load configuration
    let cfg = config::load_config()?;

    info!("Starting Warehouse Rates in foreground mode");

    // Start the server (blocks until shutdown)
    server::start_server(cfg).await?;

    Ok(())
}
