use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{auth::AuthInfo, error::AppError, handlers::quote::AppState, pricing::PricingRate};

#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub total: usize,
    pub rates: Vec<PricingRate>,
}

/// GET /v1/rates - List the active pricing rates (admin only)
pub async fn list_rates(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
) -> Result<Json<RatesResponse>, AppError> {
    auth.require_admin()?;

    let rates = state.store.fetch_active_rates().await?;

    Ok(Json(RatesResponse {
        total: rates.len(),
        rates,
    }))
}
