//! Cost report endpoints.
//!
//! Both reports run every occupant through the same resolver as the quote
//! endpoint; the rate math is not reimplemented here.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::AuthInfo,
    error::AppError,
    handlers::quote::AppState,
    metrics,
    pricing::{CostResult, PortfolioSummary, RateResolver},
    store::OccupantRecord,
};

/// One occupant in the admin report: identity plus the full cost breakdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupantCostRow {
    pub id: Uuid,
    pub name: String,
    pub area_occupied: f64,
    pub floor_type: String,
    pub cost: CostResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupantCostsResponse {
    pub generated_at: DateTime<Utc>,
    pub occupants: Vec<OccupantCostRow>,
    pub revenue_summary: PortfolioSummary,
}

/// GET /v1/reports/occupant-costs - Full per-occupant cost report (admin only)
pub async fn occupant_costs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
) -> Result<Json<OccupantCostsResponse>, AppError> {
    auth.require_admin()?;

    let (resolver, occupants) = load_snapshot(&state).await?;
    let usages: Vec<_> = occupants.iter().map(|o| o.to_usage()).collect();
    let report = resolver.summarize(&usages);

    let rows = occupants
        .into_iter()
        .zip(report.per_occupant)
        .zip(usages.iter())
        .map(|((occupant, cost), usage)| OccupantCostRow {
            id: occupant.id,
            name: occupant.name,
            area_occupied: occupant.area_occupied,
            floor_type: usage.space_type.to_string(),
            cost,
        })
        .collect();

    metrics::record_report(&auth.api_key_name, "occupant-costs");

    Ok(Json(OccupantCostsResponse {
        generated_at: Utc::now(),
        occupants: rows,
        revenue_summary: report.revenue_summary,
    }))
}

/// One user in the support report: totals only, no rate breakdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCostRow {
    pub name: String,
    pub has_warehouse: bool,
    pub area_occupied: f64,
    pub total_monthly: f64,
    pub total_annual: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCostsResponse {
    pub generated_at: DateTime<Utc>,
    pub users: Vec<UserCostRow>,
    pub revenue_summary: PortfolioSummary,
}

/// GET /v1/reports/user-costs - Per-user cost listing (supporter and admin)
pub async fn user_costs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
) -> Result<Json<UserCostsResponse>, AppError> {
    let (resolver, occupants) = load_snapshot(&state).await?;
    let usages: Vec<_> = occupants.iter().map(|o| o.to_usage()).collect();
    let report = resolver.summarize(&usages);

    let users = occupants
        .into_iter()
        .zip(report.per_occupant)
        .map(|(occupant, cost)| UserCostRow {
            name: occupant.name,
            has_warehouse: cost.has_warehouse,
            area_occupied: occupant.area_occupied,
            total_monthly: cost.total_monthly,
            total_annual: cost.total_annual,
            error: cost.error,
        })
        .collect();

    metrics::record_report(&auth.api_key_name, "user-costs");

    Ok(Json(UserCostsResponse {
        generated_at: Utc::now(),
        users,
        revenue_summary: report.revenue_summary,
    }))
}

/// Fetch one consistent snapshot of rates, settings and occupants
async fn load_snapshot(state: &AppState) -> Result<(RateResolver, Vec<OccupantRecord>), AppError> {
    let rates = state.store.fetch_active_rates().await?;
    let ewa = state.store.fetch_ewa_settings().await?;
    let occupants = state.store.fetch_occupants().await?;
    Ok((RateResolver::new(rates, ewa), occupants))
}
