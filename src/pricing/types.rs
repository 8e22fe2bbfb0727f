use serde::{Deserialize, Serialize};

/// Space categories priced by the rate table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceType {
    #[serde(rename = "Ground Floor")]
    GroundFloor,
    Mezzanine,
    Office,
}

impl SpaceType {
    /// Normalize a loose floor-type label into a space type.
    ///
    /// Occupant rows arrive with inconsistent casings ("ground", "Ground Floor",
    /// "MEZZANINE"). Unrecognized or missing labels default to ground floor.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "mezzanine" | "mezz" => Self::Mezzanine,
            "office" => Self::Office,
            _ => Self::GroundFloor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroundFloor => "Ground Floor",
            Self::Mezzanine => "Mezzanine",
            Self::Office => "Office",
        }
    }
}

impl std::fmt::Display for SpaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rental tenure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenure {
    #[serde(rename = "Very Short")]
    VeryShort,
    Short,
    Long,
}

impl Tenure {
    /// Parse a tenure label. Returns None for unknown labels so that callers
    /// fall back to the tenure-unconstrained matching path.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "long" => Some(Self::Long),
            "short" => Some(Self::Short),
            "very short" | "very_short" | "veryshort" => Some(Self::VeryShort),
            _ => None,
        }
    }

    /// Preference order when the caller does not constrain tenure:
    /// existing occupants are most likely long-term.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Long => 3,
            Self::Short => 2,
            Self::VeryShort => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryShort => "Very Short",
            Self::Short => "Short",
            Self::Long => "Long",
        }
    }
}

impl std::fmt::Display for Tenure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the pricing table: a rate for (space type, area band, tenure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRate {
    pub id: i64,
    pub space_type: SpaceType,
    pub area_band_min: f64,
    /// Inclusive upper bound; None marks the open-ended top band
    pub area_band_max: Option<f64>,
    pub tenure: Tenure,
    pub monthly_rate_per_sqm: f64,
    pub daily_rate_per_sqm: f64,
    pub min_chargeable_area: f64,
    pub active: bool,
}

impl PricingRate {
    /// Band bounds are inclusive on both ends.
    pub fn contains_area(&self, area: f64) -> bool {
        if area < self.area_band_min {
            return false;
        }
        match self.area_band_max {
            Some(max) => area <= max,
            None => true,
        }
    }

    /// Band width used by the narrowest-band tie-break. An unbounded top
    /// band is infinitely wide, so bounded bands always win against it.
    pub fn band_width(&self) -> f64 {
        match self.area_band_max {
            Some(max) => max - self.area_band_min,
            None => f64::INFINITY,
        }
    }

    pub fn band_label(&self) -> String {
        match self.area_band_max {
            Some(max) => format!("{}-{} sqm", self.area_band_min, max),
            None => format!("{}+ sqm", self.area_band_min),
        }
    }
}

/// Flat utility (EWA) estimate applied uniformly to every occupant
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EwaSettings {
    pub estimated_fixed_monthly_charges: f64,
}

/// Normalized pricing input.
///
/// Loose occupant records (absent floor types, mixed label casings) are
/// normalized into this shape exactly once, at the boundary; the resolver
/// never sees a raw string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceUsage {
    pub area: f64,
    pub space_type: SpaceType,
    pub tenure: Option<Tenure>,
}

impl SpaceUsage {
    /// Boundary normalization from raw record fields.
    pub fn from_raw(area: f64, floor_type: Option<&str>, tenure: Option<&str>) -> Self {
        Self {
            area,
            space_type: floor_type
                .map(SpaceType::from_label)
                .unwrap_or(SpaceType::GroundFloor),
            tenure: tenure.and_then(Tenure::from_label),
        }
    }
}

/// The pricing row that governed a cost result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDetails {
    pub area_band: String,
    pub tenure: Tenure,
    pub min_chargeable_area: f64,
}

/// Cost calculation output for a single occupant or quote.
///
/// Computed fresh on every request from the current rate-table snapshot;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostResult {
    pub has_warehouse: bool,
    pub chargeable_area: f64,
    pub rate_per_sqm: f64,
    pub monthly_cost: f64,
    pub annual_cost: f64,
    pub ewa_monthly: f64,
    pub ewa_annual: f64,
    pub total_monthly: f64,
    pub total_annual: f64,
    pub pricing_details: Option<PricingDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Revenue aggregation over a batch of resolved occupants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub active_occupants: usize,
    pub total_monthly_revenue: f64,
    pub total_annual_revenue: f64,
    pub average_monthly_cost: f64,
    pub total_area_occupied: f64,
}

/// Output of a batch resolution: one result per occupant plus the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReport {
    pub per_occupant: Vec<CostResult>,
    pub revenue_summary: PortfolioSummary,
}
