use crate::pricing::types::{
    CostReport, CostResult, EwaSettings, PortfolioSummary, PricingDetails, PricingRate, SpaceType,
    SpaceUsage, Tenure,
};

/// Absolute floor on the monthly charge, in BHD. Applied after the
/// per-band minimum-chargeable-area adjustment; both floors can apply.
pub const MINIMUM_MONTHLY_CHARGE: f64 = 100.0;

/// Fallback EWA estimate when no settings row exists
pub const DEFAULT_EWA_MONTHLY: f64 = 15.0;

/// Round to 3 decimal places (BHD carries mills)
fn round_bhd(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Maps a space booking's (area, space type, tenure) to the pricing row that
/// governs its cost and computes the monthly/annual totals.
///
/// Holds an immutable snapshot of the rate table and EWA settings, so a
/// resolution is a pure function of its input: identical inputs against an
/// unchanged snapshot yield identical results.
pub struct RateResolver {
    rates: Vec<PricingRate>,
    ewa_monthly: f64,
}

impl RateResolver {
    pub fn new(rates: Vec<PricingRate>, ewa: Option<EwaSettings>) -> Self {
        let ewa_monthly = ewa
            .map(|e| e.estimated_fixed_monthly_charges)
            .unwrap_or(DEFAULT_EWA_MONTHLY);
        Self { rates, ewa_monthly }
    }

    pub fn ewa_monthly(&self) -> f64 {
        self.ewa_monthly
    }

    /// Resolve the cost of a single occupant or quote input.
    ///
    /// `area <= 0` is the valid "no active space" state, not a failure. A
    /// positive area with no matching active rate yields a zero-cost result
    /// annotated with an error string; this never panics and never aborts a
    /// batch.
    pub fn resolve_cost(&self, usage: &SpaceUsage) -> CostResult {
        if usage.area <= 0.0 {
            return Self::no_space();
        }

        match self.match_rate(usage.area, usage.space_type, usage.tenure) {
            Some(rate) => self.price(usage.area, rate),
            None => Self::unmatched(),
        }
    }

    /// Resolve a batch of occupants and aggregate the portfolio summary.
    ///
    /// Per-occupant errors are carried inline in their result rows; the
    /// aggregation includes them as zero-cost entries rather than failing
    /// the whole report.
    pub fn summarize(&self, occupants: &[SpaceUsage]) -> CostReport {
        let per_occupant: Vec<CostResult> = occupants
            .iter()
            .map(|usage| self.resolve_cost(usage))
            .collect();

        let active: Vec<(&SpaceUsage, &CostResult)> = occupants
            .iter()
            .zip(per_occupant.iter())
            .filter(|(_, result)| result.has_warehouse)
            .collect();

        let total_monthly_revenue: f64 = active.iter().map(|(_, r)| r.total_monthly).sum();
        let total_annual_revenue: f64 = active.iter().map(|(_, r)| r.total_annual).sum();
        let total_area_occupied: f64 = active.iter().map(|(u, _)| u.area).sum();
        let average_monthly_cost = if active.is_empty() {
            0.0
        } else {
            total_monthly_revenue / active.len() as f64
        };

        CostReport {
            revenue_summary: PortfolioSummary {
                active_occupants: active.len(),
                total_monthly_revenue: round_bhd(total_monthly_revenue),
                total_annual_revenue: round_bhd(total_annual_revenue),
                average_monthly_cost: round_bhd(average_monthly_cost),
                total_area_occupied: round_bhd(total_area_occupied),
            },
            per_occupant,
        }
    }

    /// Find the single applicable pricing row.
    ///
    /// Tie-break rule: when several bands contain the area, the narrowest
    /// band wins (an open-ended band counts as infinitely wide). When tenure
    /// is unconstrained, candidates are first reduced to the best
    /// tenure-priority group present (Long > Short > Very Short), then
    /// width-ranked. Width ties fall back to table order.
    fn match_rate(
        &self,
        area: f64,
        space_type: SpaceType,
        tenure: Option<Tenure>,
    ) -> Option<&PricingRate> {
        let mut candidates: Vec<&PricingRate> = self
            .rates
            .iter()
            .filter(|r| r.active && r.space_type == space_type && r.contains_area(area))
            .collect();

        match tenure {
            Some(t) => candidates.retain(|r| r.tenure == t),
            None => {
                if let Some(best) = candidates.iter().map(|r| r.tenure.priority()).max() {
                    candidates.retain(|r| r.tenure.priority() == best);
                }
            }
        }

        candidates
            .into_iter()
            .min_by(|a, b| a.band_width().total_cmp(&b.band_width()))
    }

    fn price(&self, area: f64, rate: &PricingRate) -> CostResult {
        // Area floor first, then the absolute minimum-charge floor
        let chargeable_area = area.max(rate.min_chargeable_area);
        let mut monthly_cost = chargeable_area * rate.monthly_rate_per_sqm;
        let mut annual_cost = monthly_cost * 12.0;
        if monthly_cost < MINIMUM_MONTHLY_CHARGE {
            monthly_cost = MINIMUM_MONTHLY_CHARGE;
            annual_cost = MINIMUM_MONTHLY_CHARGE * 12.0;
        }

        let ewa_monthly = self.ewa_monthly;
        let ewa_annual = ewa_monthly * 12.0;

        CostResult {
            has_warehouse: true,
            chargeable_area,
            rate_per_sqm: rate.monthly_rate_per_sqm,
            monthly_cost: round_bhd(monthly_cost),
            annual_cost: round_bhd(annual_cost),
            ewa_monthly: round_bhd(ewa_monthly),
            ewa_annual: round_bhd(ewa_annual),
            total_monthly: round_bhd(monthly_cost + ewa_monthly),
            total_annual: round_bhd(annual_cost + ewa_annual),
            pricing_details: Some(PricingDetails {
                area_band: rate.band_label(),
                tenure: rate.tenure,
                min_chargeable_area: rate.min_chargeable_area,
            }),
            error: None,
        }
    }

    fn no_space() -> CostResult {
        CostResult {
            has_warehouse: false,
            chargeable_area: 0.0,
            rate_per_sqm: 0.0,
            monthly_cost: 0.0,
            annual_cost: 0.0,
            ewa_monthly: 0.0,
            ewa_annual: 0.0,
            total_monthly: 0.0,
            total_annual: 0.0,
            pricing_details: None,
            error: None,
        }
    }

    fn unmatched() -> CostResult {
        CostResult {
            error: Some("No pricing rate found".to_string()),
            has_warehouse: true,
            ..Self::no_space()
        }
    }
}
