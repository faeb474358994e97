//! Benchmarks a scenario against listing-site statistics.
//!
//! Quartiles come from the market summary service and never feed back into the
//! price formula; this module only positions the user's figures against them.

use crate::report::CalculationResult;
use core_types::ScenarioConfig;
use serde::{Deserialize, Serialize};

/// Per-m² quartiles of the listing distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Where the required sale price sits relative to the market totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketPosition {
    /// No market totals available (no surface or no per-m² figures).
    Unknown,
    BelowMin,
    BetweenMinAndAvg,
    BetweenAvgAndMax,
    AboveMax,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketBenchmark {
    /// Surface × median per-m² price.
    pub recommended_total: f64,
    pub listing_range_low: f64,
    pub listing_range_high: f64,
    /// What the old apartment cost per m² when it was bought.
    pub purchase_price_per_sqm: f64,
    /// Estimated percentile (0-100) of `purchase_price_per_sqm` in the market;
    /// `None` when there is no purchase price per m² to place.
    pub percentile: Option<f64>,
    pub sale_position: MarketPosition,
}

impl MarketBenchmark {
    pub fn new(config: &ScenarioConfig, result: &CalculationResult, quartiles: Quartiles) -> Self {
        let surface = config.old_apartment.surface_area_sqm.unwrap_or(0.0);
        let purchase = config.old_apartment.purchase_price;
        let purchase_price_per_sqm = if surface > 0.0 { purchase / surface } else { 0.0 };

        Self {
            recommended_total: surface * quartiles.q2,
            listing_range_low: surface * quartiles.q1,
            listing_range_high: surface * quartiles.q3,
            purchase_price_per_sqm,
            percentile: estimate_percentile(purchase_price_per_sqm, quartiles),
            sale_position: sale_position(result),
        }
    }
}

/// Linear interpolation inside each quartile band. Above Q3 the band is
/// extrapolated with the Q2-Q3 width, capped at two widths (100th percentile).
pub fn estimate_percentile(price_per_sqm: f64, q: Quartiles) -> Option<f64> {
    if price_per_sqm == 0.0 {
        return None;
    }
    let pct = if price_per_sqm < q.q1 {
        (price_per_sqm / q.q1 * 25.0).max(0.0)
    } else if price_per_sqm < q.q2 {
        25.0 + (price_per_sqm - q.q1) / (q.q2 - q.q1) * 25.0
    } else if price_per_sqm < q.q3 {
        50.0 + (price_per_sqm - q.q2) / (q.q3 - q.q2) * 25.0
    } else {
        let ratio = ((price_per_sqm - q.q3) / (q.q3 - q.q2)).min(2.0);
        75.0 + ratio * 12.5
    };
    Some(pct)
}

pub fn sale_position(result: &CalculationResult) -> MarketPosition {
    if result.is_error() || result.market_avg <= 0.0 {
        return MarketPosition::Unknown;
    }
    let sale = result.sale_price;
    if result.market_min > 0.0 && sale < result.market_min {
        MarketPosition::BelowMin
    } else if sale <= result.market_avg {
        MarketPosition::BetweenMinAndAvg
    } else if result.market_max <= 0.0 || sale <= result.market_max {
        MarketPosition::BetweenAvgAndMax
    } else {
        MarketPosition::AboveMax
    }
}
