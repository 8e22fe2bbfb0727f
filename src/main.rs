use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use warehouse_rates::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Initialize tracing/logging early
    init_tracing();

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Start => {
            commands::start::execute().await?;
        }
        cli::Commands::Test => {
            commands::test::execute()?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show()?,
            cli::ConfigCommands::Validate => commands::config::validate()?,
        },
        cli::Commands::Seed => {
            commands::seed::execute().await?;
        }
        cli::Commands::Version => {
            println!("Warehouse Rates v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
