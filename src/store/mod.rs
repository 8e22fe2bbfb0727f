//! Data access for the pricing tables.
//!
//! The rate table, EWA settings and occupant roster live in SQLite. Handlers
//! fetch one snapshot per request and hand it to the resolver; nothing here
//! is cached between requests.

pub mod seed;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

use crate::pricing::{EwaSettings, PricingRate, SpaceType, SpaceUsage, Tenure};

/// Occupant row as stored. Floor type and tenure are kept as the raw,
/// possibly absent labels; normalization happens in [`SpaceUsage::from_raw`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct OccupantRecord {
    pub id: Uuid,
    pub name: String,
    pub area_occupied: f64,
    pub floor_type: Option<String>,
    pub tenure: Option<String>,
}

impl OccupantRecord {
    pub fn to_usage(&self) -> SpaceUsage {
        SpaceUsage::from_raw(
            self.area_occupied,
            self.floor_type.as_deref(),
            self.tenure.as_deref(),
        )
    }
}

/// SQLite-backed store for rates, settings and occupants
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database and ensure the schema exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to open SQLite database")?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Liveness probe used by the readiness endpoint
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pricing_rates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                space_type TEXT NOT NULL,
                area_band_min REAL NOT NULL,
                area_band_max REAL,
                tenure TEXT NOT NULL,
                monthly_rate_per_sqm REAL NOT NULL,
                daily_rate_per_sqm REAL NOT NULL,
                min_chargeable_area REAL NOT NULL DEFAULT 0,
                active INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create pricing_rates table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ewa_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                estimated_fixed_monthly_charges REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create ewa_settings table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS occupants (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                area_occupied REAL NOT NULL DEFAULT 0,
                floor_type TEXT,
                tenure TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create occupants table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seed_versions (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create seed_versions table")?;

        Ok(())
    }

    /// Load all active pricing rates.
    ///
    /// Rows with labels the domain does not know are skipped with a warning
    /// rather than failing the whole snapshot. The stable ORDER BY makes the
    /// resolver's table-order tie-break deterministic.
    pub async fn fetch_active_rates(&self) -> Result<Vec<PricingRate>> {
        #[derive(sqlx::FromRow)]
        struct RateRow {
            id: i64,
            space_type: String,
            area_band_min: f64,
            area_band_max: Option<f64>,
            tenure: String,
            monthly_rate_per_sqm: f64,
            daily_rate_per_sqm: f64,
            min_chargeable_area: f64,
        }

        let rows = sqlx::query_as::<_, RateRow>(
            r#"
            SELECT id, space_type, area_band_min, area_band_max, tenure,
                   monthly_rate_per_sqm, daily_rate_per_sqm, min_chargeable_area
            FROM pricing_rates
            WHERE active = 1
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load pricing rates")?;

        let mut rates = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(tenure) = Tenure::from_label(&row.tenure) else {
                tracing::warn!(id = row.id, tenure = %row.tenure, "Unknown tenure label on pricing rate, skipping");
                continue;
            };

            rates.push(PricingRate {
                id: row.id,
                space_type: SpaceType::from_label(&row.space_type),
                area_band_min: row.area_band_min,
                area_band_max: row.area_band_max,
                tenure,
                monthly_rate_per_sqm: row.monthly_rate_per_sqm,
                daily_rate_per_sqm: row.daily_rate_per_sqm,
                min_chargeable_area: row.min_chargeable_area,
                active: true,
            });
        }

        Ok(rates)
    }

    /// Load the EWA settings singleton, if present
    pub async fn fetch_ewa_settings(&self) -> Result<Option<EwaSettings>> {
        #[derive(sqlx::FromRow)]
        struct EwaRow {
            estimated_fixed_monthly_charges: f64,
        }

        let row = sqlx::query_as::<_, EwaRow>(
            "SELECT estimated_fixed_monthly_charges FROM ewa_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load EWA settings")?;

        Ok(row.map(|r| EwaSettings {
            estimated_fixed_monthly_charges: r.estimated_fixed_monthly_charges,
        }))
    }

    /// Load all active occupants for the cost reports
    pub async fn fetch_occupants(&self) -> Result<Vec<OccupantRecord>> {
        #[derive(sqlx::FromRow)]
        struct OccupantRow {
            id: String,
            name: String,
            area_occupied: f64,
            floor_type: Option<String>,
            tenure: Option<String>,
        }

        let rows = sqlx::query_as::<_, OccupantRow>(
            r#"
            SELECT id, name, area_occupied, floor_type, tenure
            FROM occupants
            WHERE active = 1
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load occupants")?;

        let mut occupants = Vec::with_capacity(rows.len());
        for row in rows {
            let Ok(id) = Uuid::parse_str(&row.id) else {
                tracing::warn!(id = %row.id, "Occupant row with malformed id, skipping");
                continue;
            };

            occupants.push(OccupantRecord {
                id,
                name: row.name,
                area_occupied: row.area_occupied,
                floor_type: row.floor_type,
                tenure: row.tenure,
            });
        }

        Ok(occupants)
    }
}
