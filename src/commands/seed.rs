use anyhow::Result;
use colored::Colorize;
use tracing::info;
use warehouse_rates::{config, store::seed, store::Store};

/// Execute the seed command
///
/// Applies the shipped pricing seed data to the configured database.
/// Re-running against an already-seeded database is a no-op.
pub async fn execute() -> Result<()> {
    let cfg = config::load_config()?;

    println!(
        "{} {}",
        "Seeding pricing data into".yellow(),
        cfg.database.url
    );

    let store = Store::connect(&cfg.database.url).await?;
    let summary = seed::apply(&store).await?;

    if summary.applied {
        println!(
            "{} version {} ({} rates)",
            "✓ Seed applied:".green(),
            summary.version,
            summary.rates_inserted
        );
        info!(
            version = summary.version,
            rates = summary.rates_inserted,
            "Seed applied"
        );
    } else {
        println!(
            "{} version {} already present, nothing to do",
            "✓ Seed skipped:".green(),
            summary.version
        );
    }

    Ok(())
}
