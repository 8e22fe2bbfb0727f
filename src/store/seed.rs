//! Versioned, declarative seed data.
//!
//! The pricing tables ship as data in this file and are applied exactly once
//! per version at deploy time via the `seed` CLI command. There are no
//! mutable fix-up scripts: a pricing change is a new seed version.
//!
//! Mezzanine rates are defined as exactly 80% of the matching Ground Floor
//! rate for every (band, tenure) pair, rounded to mills; a regression test
//! pins this relationship.

use anyhow::{Context, Result};

use crate::pricing::{SpaceType, Tenure};
use crate::store::Store;

/// Bump on any change to the tables below
pub const SEED_VERSION: i64 = 1;

/// EWA settings row installed when none exists
pub const SEED_EWA_MONTHLY: f64 = 15.0;

/// One pricing row of the shipped rate table
#[derive(Debug, Clone, Copy)]
pub struct SeedRate {
    pub space_type: SpaceType,
    pub area_band_min: f64,
    pub area_band_max: Option<f64>,
    pub tenure: Tenure,
    pub monthly_rate_per_sqm: f64,
    pub daily_rate_per_sqm: f64,
    pub min_chargeable_area: f64,
}

/// The full shipped rate table: Ground Floor, Mezzanine (x0.8), Office.
pub fn seed_rates() -> Vec<SeedRate> {
    fn row(
        space_type: SpaceType,
        band: (f64, Option<f64>),
        tenure: Tenure,
        monthly: f64,
        daily: f64,
        min_chargeable: f64,
    ) -> SeedRate {
        SeedRate {
            space_type,
            area_band_min: band.0,
            area_band_max: band.1,
            tenure,
            monthly_rate_per_sqm: monthly,
            daily_rate_per_sqm: daily,
            min_chargeable_area: min_chargeable,
        }
    }

    use SpaceType::{GroundFloor, Mezzanine, Office};
    use Tenure::{Long, Short, VeryShort};

    let b1 = (1.0, Some(99.0));
    let b2 = (100.0, Some(249.0));
    let b3 = (250.0, Some(499.0));
    let b4 = (500.0, None);
    let office_top = (100.0, None);

    vec![
        // Ground Floor
        row(GroundFloor, b1, Long, 3.000, 0.100, 30.0),
        row(GroundFloor, b1, Short, 3.500, 0.117, 30.0),
        row(GroundFloor, b1, VeryShort, 4.000, 0.133, 30.0),
        row(GroundFloor, b2, Long, 2.750, 0.092, 100.0),
        row(GroundFloor, b2, Short, 3.250, 0.108, 100.0),
        row(GroundFloor, b2, VeryShort, 3.750, 0.125, 100.0),
        row(GroundFloor, b3, Long, 2.500, 0.083, 250.0),
        row(GroundFloor, b3, Short, 3.000, 0.100, 250.0),
        row(GroundFloor, b3, VeryShort, 3.500, 0.117, 250.0),
        row(GroundFloor, b4, Long, 2.250, 0.075, 500.0),
        row(GroundFloor, b4, Short, 2.750, 0.092, 500.0),
        row(GroundFloor, b4, VeryShort, 3.250, 0.108, 500.0),
        // Mezzanine, 20% below Ground Floor
        row(Mezzanine, b1, Long, 2.400, 0.080, 30.0),
        row(Mezzanine, b1, Short, 2.800, 0.093, 30.0),
        row(Mezzanine, b1, VeryShort, 3.200, 0.107, 30.0),
        row(Mezzanine, b2, Long, 2.200, 0.073, 100.0),
        row(Mezzanine, b2, Short, 2.600, 0.087, 100.0),
        row(Mezzanine, b2, VeryShort, 3.000, 0.100, 100.0),
        row(Mezzanine, b3, Long, 2.000, 0.067, 250.0),
        row(Mezzanine, b3, Short, 2.400, 0.080, 250.0),
        row(Mezzanine, b3, VeryShort, 2.800, 0.093, 250.0),
        row(Mezzanine, b4, Long, 1.800, 0.060, 500.0),
        row(Mezzanine, b4, Short, 2.200, 0.073, 500.0),
        row(Mezzanine, b4, VeryShort, 2.600, 0.087, 500.0),
        // Office
        row(Office, b1, Long, 4.000, 0.133, 20.0),
        row(Office, b1, Short, 4.500, 0.150, 20.0),
        row(Office, b1, VeryShort, 5.000, 0.167, 20.0),
        row(Office, office_top, Long, 3.750, 0.125, 100.0),
        row(Office, office_top, Short, 4.250, 0.142, 100.0),
        row(Office, office_top, VeryShort, 4.750, 0.158, 100.0),
    ]
}

/// Outcome of a seed run
#[derive(Debug, Clone, Copy)]
pub struct SeedSummary {
    pub version: i64,
    pub applied: bool,
    pub rates_inserted: usize,
}

/// Apply the current seed version if it has not been applied yet.
///
/// Re-running against an already-seeded database is a no-op; the applied
/// version is recorded in `seed_versions`.
pub async fn apply(store: &Store) -> Result<SeedSummary> {
    let already_applied: Option<(i64,)> =
        sqlx::query_as("SELECT version FROM seed_versions WHERE version = ?")
            .bind(SEED_VERSION)
            .fetch_optional(store.pool())
            .await
            .context("Failed to check seed version")?;

    if already_applied.is_some() {
        return Ok(SeedSummary {
            version: SEED_VERSION,
            applied: false,
            rates_inserted: 0,
        });
    }

    let rates = seed_rates();
    for rate in &rates {
        sqlx::query(
            r#"
            INSERT INTO pricing_rates
                (space_type, area_band_min, area_band_max, tenure,
                 monthly_rate_per_sqm, daily_rate_per_sqm, min_chargeable_area, active)
            VALUES (?, ?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(rate.space_type.as_str())
        .bind(rate.area_band_min)
        .bind(rate.area_band_max)
        .bind(rate.tenure.as_str())
        .bind(rate.monthly_rate_per_sqm)
        .bind(rate.daily_rate_per_sqm)
        .bind(rate.min_chargeable_area)
        .execute(store.pool())
        .await
        .context("Failed to insert seed pricing rate")?;
    }

    // Keep an operator-tuned EWA estimate if one is already present
    sqlx::query(
        "INSERT OR IGNORE INTO ewa_settings (id, estimated_fixed_monthly_charges) VALUES (1, ?)",
    )
    .bind(SEED_EWA_MONTHLY)
    .execute(store.pool())
    .await
    .context("Failed to insert EWA settings")?;

    sqlx::query("INSERT INTO seed_versions (version) VALUES (?)")
        .bind(SEED_VERSION)
        .execute(store.pool())
        .await
        .context("Failed to record seed version")?;

    tracing::info!(
        version = SEED_VERSION,
        rates = rates.len(),
        "Seed data applied"
    );

    Ok(SeedSummary {
        version: SEED_VERSION,
        applied: true,
        rates_inserted: rates.len(),
    })
}
