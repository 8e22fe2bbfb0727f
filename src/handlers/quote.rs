//! Cost quote endpoint.
//!
//! Fetches a fresh rate-table snapshot per request and runs it through the
//! resolver; there is no caching and no state carried between quotes.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    auth::AuthInfo,
    config::Config,
    error::AppError,
    metrics,
    pricing::{CostResult, RateResolver, SpaceUsage},
    store::Store,
};

/// Shared state for all API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<arc_swap::ArcSwap<Config>>,
    pub store: Store,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// Occupied area in square meters; must be positive
    pub area: f64,
    /// Loose floor label ("ground", "Mezzanine", ...); defaults to ground floor
    pub floor_type: Option<String>,
    /// Tenure label; omitted means "price as a long-term occupant"
    pub tenure: Option<String>,
}

/// POST /v1/quote - Compute a rental cost quote
pub async fn handle_quote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<CostResult>, AppError> {
    // Zero-area "no active space" is a report-only state; an explicit quote
    // for it is a caller bug. This also rejects NaN.
    if !(req.area > 0.0) {
        return Err(AppError::InvalidInput(
            "area must be a positive number".to_string(),
        ));
    }

    let started = Instant::now();

    let rates = state.store.fetch_active_rates().await?;
    let ewa = state.store.fetch_ewa_settings().await?;
    let resolver = RateResolver::new(rates, ewa);

    let usage = SpaceUsage::from_raw(req.area, req.floor_type.as_deref(), req.tenure.as_deref());
    let result = resolver.resolve_cost(&usage);

    if result.error.is_some() {
        metrics::record_rate_miss(usage.space_type.as_str());
    }
    metrics::record_quote(&auth.api_key_name, usage.space_type.as_str());
    metrics::record_quote_duration(started.elapsed());

    Ok(Json(result))
}
