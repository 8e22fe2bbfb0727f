//! Rate resolution and cost calculation.
//!
//! This is the single authoritative implementation of the rate-matching and
//! cost math. Every endpoint that prices a space goes through [`RateResolver`];
//! nothing else in the tree multiplies an area by a rate.

pub mod resolver;
pub mod types;

pub use resolver::{RateResolver, DEFAULT_EWA_MONTHLY, MINIMUM_MONTHLY_CHARGE};
pub use types::{
    CostReport, CostResult, EwaSettings, PortfolioSummary, PricingDetails, PricingRate, SpaceType,
    SpaceUsage, Tenure,
};
