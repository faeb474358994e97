use crate::defaults::default_scenario;
use core_types::ScenarioConfig;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named what-if applied on top of the current scenario.
///
/// Presets only touch the market prices per m², the agent percentage and the
/// months of lost rent; every other section is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Preset {
    #[default]
    Base,
    Optimistic,
    Conservative,
}

/// The knobs a preset turns. `None` means "leave the current value alone".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetParams {
    pub market_multiplier: Decimal,
    pub agent_pct: Option<f64>,
    pub months_lost: Option<f64>,
}

impl Preset {
    pub fn label(&self) -> &'static str {
        match self {
            Preset::Base => "Base",
            Preset::Optimistic => "Optimistic",
            Preset::Conservative => "Conservative",
        }
    }

    pub fn params(&self) -> PresetParams {
        match self {
            Preset::Base => PresetParams {
                market_multiplier: dec!(1.0),
                agent_pct: None,
                months_lost: None,
            },
            Preset::Optimistic => PresetParams {
                market_multiplier: dec!(1.07),
                agent_pct: Some(3.0),
                months_lost: Some(0.0),
            },
            Preset::Conservative => PresetParams {
                market_multiplier: dec!(0.93),
                agent_pct: Some(4.5),
                months_lost: Some(2.0),
            },
        }
    }

    /// Returns `config` with this preset applied.
    pub fn apply(&self, config: &ScenarioConfig) -> ScenarioConfig {
        let defaults = default_scenario();
        let mut out = config.clone();

        if *self == Preset::Base {
            let d = &defaults.old_apartment;
            out.old_apartment.market_price_per_sqm_min = d.market_price_per_sqm_min;
            out.old_apartment.market_price_per_sqm_avg = d.market_price_per_sqm_avg;
            out.old_apartment.market_price_per_sqm_max = d.market_price_per_sqm_max;
            out.old_apartment.market_price_per_sqm = d.market_price_per_sqm;
            out.agent_fee.percentage = defaults.agent_fee.percentage;
            out.rental_income.months_lost = defaults.rental_income.months_lost;
            return out;
        }

        let params = self.params();
        let d = &defaults.old_apartment;
        let fallback = d
            .market_price_per_sqm
            .or(d.market_price_per_sqm_avg)
            .or(d.market_price_per_sqm_min)
            .unwrap_or(0.0);
        let scale =
            |v: Option<f64>| Some(scale_price(v.unwrap_or(fallback), params.market_multiplier));

        out.old_apartment.market_price_per_sqm_min = scale(d.market_price_per_sqm_min);
        out.old_apartment.market_price_per_sqm_avg = scale(d.market_price_per_sqm_avg);
        out.old_apartment.market_price_per_sqm_max = scale(d.market_price_per_sqm_max);
        if let Some(agent) = params.agent_pct {
            out.agent_fee.percentage = agent;
        }
        if let Some(months) = params.months_lost {
            out.rental_income.months_lost = months;
        }
        tracing::debug!(preset = self.label(), "Preset applied.");
        out
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `price * multiplier`, rounded half away from zero to 2 decimals.
fn scale_price(price: f64, multiplier: Decimal) -> f64 {
    match Decimal::from_f64(price) {
        Some(p) => (p * multiplier)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(0.0),
        None => 0.0,
    }
}
