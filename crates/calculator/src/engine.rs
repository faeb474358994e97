use crate::error::{CalcError, INVALID_COEFFICIENTS_MSG};
use crate::report::CalculationResult;
use core_types::{OldApartment, ScenarioConfig};

/// Synthetic spread applied around a single blended per-m² figure.
const BLENDED_MIN_FACTOR: f64 = 0.9;
const BLENDED_MAX_FACTOR: f64 = 1.1;

/// A stateless calculator for the minimum sale price of a scenario.
///
/// Thin facade over [`compute`] for callers that would rather receive a
/// `Result` than inspect `CalculationResult::error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SaleCalculator;

impl SaleCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Runs the engine and lifts the sentinel error into `CalcError`.
    pub fn calculate(&self, config: &ScenarioConfig) -> Result<CalculationResult, CalcError> {
        compute(config).into_result()
    }
}

/// Per-m² market triple (min, avg, max) for the old apartment.
fn market_per_sqm(old: &OldApartment, surface: f64) -> (f64, f64, f64) {
    if surface <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    if let Some(avg) = old.market_price_per_sqm_avg {
        (
            old.market_price_per_sqm_min.unwrap_or(0.0),
            avg,
            old.market_price_per_sqm_max.unwrap_or(0.0),
        )
    } else if let Some(avg) = old.market_price_per_sqm {
        (avg * BLENDED_MIN_FACTOR, avg, avg * BLENDED_MAX_FACTOR)
    } else {
        (0.0, 0.0, 0.0)
    }
}

/// Derives the minimum sale price and every dependent figure from a scenario.
///
/// The sale price `S` solves
///
/// ```text
/// (S - S*agent - tax(S) - lost) * (1 - conv) = target_with_notary
/// ```
///
/// where `tax(S) = (S - purchase) * rate / 200`. Every deduction is affine in
/// `S`, so the equation is solved in one step. The order of floating-point
/// operations below is part of the contract: consumers compare figures across
/// runs and exports, so two identical scenarios must yield identical bits.
///
/// The only rejection is a non-positive denominator, reported through
/// `CalculationResult::error` with every numeric field zeroed.
pub fn compute(config: &ScenarioConfig) -> CalculationResult {
    // --- 1. Target: new apartment (+ parking) + notary ---
    let target_base = config.new_apartment.target_base();

    let notary_pct = if config.notary_tax.enabled {
        config.notary_tax.percentage
    } else {
        0.0
    };
    let notary_tax = (target_base * notary_pct) / 100.0;
    let target_with_notary = target_base + notary_tax;

    // --- 2. Old apartment and rates ---
    let old_purchase = config.old_apartment.purchase_price;
    let rates = &config.exchange_rates;
    let surface = config.old_apartment.surface_area_sqm.unwrap_or(0.0);

    // --- 3. Market prices per m² ---
    let (min_mp, avg_mp, max_mp) = market_per_sqm(&config.old_apartment, surface);
    let market_min = surface * min_mp;
    let market_avg = surface * avg_mp;
    let market_max = surface * max_mp;

    // --- 4. Coefficients ---
    let agent_coef = if config.agent_fee.enabled {
        config.agent_fee.percentage / 100.0
    } else {
        0.0
    };

    let income_tax = config.income_tax.enabled;
    let tax_rate = if income_tax { config.income_tax.rate } else { 0.0 };
    // Tax is levied on half of the profit, folded into the coefficient.
    let tax_coef = if income_tax { tax_rate / 200.0 } else { 0.0 };

    let lost_rental = if config.rental_income.enabled {
        config.rental_income.monthly_amount * config.rental_income.months_lost
    } else {
        0.0
    };

    let conversion_enabled = config.currency_conversion.enabled;
    let mdl_via_ron = rates.eur_to_ron * rates.ron_to_mdl;
    let conversion_coef = if conversion_enabled && rates.eur_to_mdl > 0.0 {
        (mdl_via_ron - rates.eur_to_mdl) / rates.eur_to_mdl
    } else {
        0.0
    };

    // --- 5. Validation gate ---
    let denom = (1.0 - agent_coef - tax_coef) * (1.0 - conversion_coef);
    // `!(x > 0)` also catches NaN coming from non-finite percentages.
    if !(denom > 0.0) {
        tracing::debug!(
            agent_coef,
            tax_coef,
            conversion_coef,
            denom,
            "Price equation is degenerate."
        );
        return CalculationResult::failed(INVALID_COEFFICIENTS_MSG);
    }

    // --- 6. Numerator ---
    let mut numerator = target_with_notary + lost_rental * (1.0 - conversion_coef);
    if income_tax {
        numerator -= old_purchase * tax_coef * (1.0 - conversion_coef);
    }

    // --- 7. Sale price ---
    let sale_price = numerator / denom;

    // --- 8. Derived amounts ---
    let agent_fee = sale_price * agent_coef;
    let profit = sale_price - old_purchase;
    // Realized tax: losses are never taxed.
    let tax = if income_tax && profit > 0.0 {
        (profit / 2.0) * (tax_rate / 100.0)
    } else {
        0.0
    };

    // --- 9. Net before and after conversion ---
    let net_before_conv = sale_price - agent_fee - tax - lost_rental;
    let conv_cost = if conversion_enabled {
        net_before_conv * conversion_coef
    } else {
        0.0
    };
    let net = net_before_conv - conv_cost;

    // --- 10. KPIs ---
    let cover_pct = if target_with_notary > 0.0 {
        (net / target_with_notary) * 100.0
    } else {
        0.0
    };
    let inv_return_pct = if old_purchase > 0.0 {
        (profit / old_purchase) * 100.0
    } else {
        0.0
    };

    tracing::trace!(sale_price, net, target_with_notary, "Scenario computed.");

    CalculationResult {
        error: None,

        sale_price,
        agent_fee,
        tax,
        net,
        target_with_notary,
        notary_tax,
        conv_cost,
        net_before_conv,
        profit,
        lost_rental,

        // --- 11. Secondary currencies, unrounded ---
        sale_mdl: sale_price * rates.eur_to_mdl,
        agent_mdl: agent_fee * rates.eur_to_mdl,
        tax_mdl: tax * rates.eur_to_mdl,
        lost_mdl: lost_rental * rates.eur_to_mdl,
        net_before_conv_mdl: net_before_conv * rates.eur_to_mdl,
        conv_cost_mdl: conv_cost * rates.eur_to_mdl,
        sale_ron: sale_price * rates.eur_to_ron,
        notary_tax_ron: notary_tax * rates.eur_to_ron,
        net_ron: net * rates.eur_to_ron,

        market_min,
        market_avg,
        market_max,
        min_mp,
        avg_mp,
        max_mp,
        surface,

        eur_to_mdl: rates.eur_to_mdl,
        eur_to_ron: rates.eur_to_ron,
        ron_to_mdl: rates.ron_to_mdl,

        conversion_pct: if conversion_enabled {
            conversion_coef * 100.0
        } else {
            0.0
        },

        verification_diff: (net - target_with_notary).abs(),
        cover_pct,
        inv_return_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{
        AgentFee, CurrencyConversion, ExchangeRates, IncomeTax, NewApartment, NotaryTax,
        RentalIncome,
    };

    fn base_scenario() -> ScenarioConfig {
        ScenarioConfig {
            meta: None,
            new_apartment: NewApartment {
                address: None,
                price_apartment: 77189.0,
                price_parking: 8470.0,
                include_parking_in_calculation: true,
                notary_country: None,
            },
            old_apartment: OldApartment {
                purchase_price: 17800.0,
                surface_area_sqm: Some(50.2),
                market_price_per_sqm_min: Some(1800.0),
                market_price_per_sqm_avg: Some(2150.0),
                market_price_per_sqm_max: Some(2400.0),
                ..OldApartment::default()
            },
            exchange_rates: ExchangeRates {
                eur_to_mdl: 19.6497,
                eur_to_ron: 5.0845,
                ron_to_mdl: 3.9,
            },
            currency_conversion: CurrencyConversion { enabled: false },
            notary_tax: NotaryTax {
                enabled: true,
                percentage: 1.0,
            },
            agent_fee: AgentFee {
                enabled: true,
                percentage: 4.0,
            },
            income_tax: IncomeTax {
                enabled: true,
                rate: 12.0,
            },
            rental_income: RentalIncome::default(),
        }
    }

    #[test]
    fn reference_scenario_without_conversion() {
        let r = compute(&base_scenario());
        assert!(r.error.is_none());
        assert_eq!(r.target_with_notary, 86515.59);
        assert_eq!(r.notary_tax, 856.59);
        assert_eq!(r.sale_price, 94941.76666666668);
        assert_eq!(r.agent_fee, 3797.6706666666673);
        assert_eq!(r.profit, 77141.76666666668);
        assert_eq!(r.tax, 4628.506);
        assert_eq!(r.conv_cost, 0.0);
        assert_eq!(r.conversion_pct, 0.0);
        assert!(r.verification_diff < 1e-9);
    }

    #[test]
    fn reference_scenario_with_conversion() {
        let mut cfg = base_scenario();
        cfg.currency_conversion.enabled = true;
        let r = compute(&cfg);
        assert_eq!(r.sale_price, 95829.73954447519);
        assert_eq!(r.conv_cost, 799.1755900276665);
        assert_eq!(r.conversion_pct, 0.9152811493305336);
        assert!((r.net - r.target_with_notary).abs() < 1e-6);
    }

    #[test]
    fn explicit_average_does_not_synthesize_spread() {
        let mut cfg = base_scenario();
        cfg.old_apartment.market_price_per_sqm_min = None;
        cfg.old_apartment.market_price_per_sqm_max = None;
        let r = compute(&cfg);
        assert_eq!(r.market_avg, 107930.0);
        assert_eq!(r.market_min, 0.0);
        assert_eq!(r.market_max, 0.0);
    }

    #[test]
    fn blended_figure_gets_ten_percent_spread() {
        let mut cfg = base_scenario();
        cfg.old_apartment.surface_area_sqm = Some(40.0);
        cfg.old_apartment.market_price_per_sqm_min = None;
        cfg.old_apartment.market_price_per_sqm_avg = None;
        cfg.old_apartment.market_price_per_sqm_max = None;
        cfg.old_apartment.market_price_per_sqm = Some(2000.0);
        let r = compute(&cfg);
        assert_eq!(r.avg_mp, 2000.0);
        assert_eq!(r.min_mp, 1800.0);
        assert_eq!(r.max_mp, 2200.0);
        assert_eq!(r.market_avg, 80000.0);
    }

    #[test]
    fn market_is_zero_without_surface() {
        let mut cfg = base_scenario();
        cfg.old_apartment.surface_area_sqm = None;
        let r = compute(&cfg);
        assert_eq!((r.min_mp, r.avg_mp, r.max_mp), (0.0, 0.0, 0.0));
        assert_eq!(r.market_avg, 0.0);
    }

    #[test]
    fn degenerate_coefficients_zero_everything() {
        let mut cfg = base_scenario();
        cfg.agent_fee.percentage = 95.0;
        let r = compute(&cfg);
        assert_eq!(r.error.as_deref(), Some(INVALID_COEFFICIENTS_MSG));
        assert!(r.numeric_fields().iter().all(|(_, v)| *v == 0.0));
        assert!(SaleCalculator::new().calculate(&cfg).is_err());
    }

    #[test]
    fn conversion_coefficient_can_invert_the_denominator() {
        let mut cfg = base_scenario();
        cfg.currency_conversion.enabled = true;
        // Routing through RON at twice the direct rate: conv coef = 1.
        cfg.exchange_rates = ExchangeRates {
            eur_to_mdl: 10.0,
            eur_to_ron: 5.0,
            ron_to_mdl: 4.0,
        };
        assert!(compute(&cfg).is_error());
    }

    #[test]
    fn zero_primary_rate_disables_conversion() {
        let mut cfg = base_scenario();
        cfg.currency_conversion.enabled = true;
        cfg.exchange_rates.eur_to_mdl = 0.0;
        let r = compute(&cfg);
        assert_eq!(r.conversion_pct, 0.0);
        assert_eq!(r.conv_cost, 0.0);
        assert_eq!(r.sale_mdl, 0.0);
        assert_eq!(r.sale_price, compute(&base_scenario()).sale_price);
    }

    #[test]
    fn kpis_never_divide_by_zero() {
        let mut cfg = base_scenario();
        cfg.old_apartment.purchase_price = 0.0;
        cfg.new_apartment.price_apartment = 0.0;
        cfg.new_apartment.price_parking = 0.0;
        let r = compute(&cfg);
        assert_eq!(r.inv_return_pct, 0.0);
        assert_eq!(r.cover_pct, 0.0);
        assert!(r.numeric_fields().iter().all(|(_, v)| v.is_finite()));
    }

    #[test]
    fn realized_tax_is_zero_on_a_loss() {
        let mut cfg = base_scenario();
        cfg.old_apartment.purchase_price = 500_000.0;
        let r = compute(&cfg);
        assert!(r.profit < 0.0);
        assert_eq!(r.tax, 0.0);
        // The coefficient form still credited the loss, so the chain no longer closes.
        assert!(r.verification_diff > 1.0);
    }
}
