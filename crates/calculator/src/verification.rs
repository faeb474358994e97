//! Line-item views over a `CalculationResult`: the verification chain, the
//! fees-and-taxes table, the conversion explainer and user-facing warnings.

use crate::format::to_fixed;
use crate::report::CalculationResult;
use core_types::{Currency, ScenarioConfig};
use serde::Serialize;

/// Cover percentage below which the sale is flagged as insufficient.
pub const LOW_COVER_PCT: f64 = 80.0;

/// Verification gap, in EUR, above which the chain is flagged as inconsistent.
pub const NOTABLE_DIFF_EUR: f64 = 1.0;

/// Visual weight of a verification row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowTone {
    Head,
    Normal,
    HighlightBlue,
    HighlightGreen,
    HighlightGreenSoft,
    Footer,
}

/// One step of the "sale price down to target" chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationRow {
    pub label: &'static str,
    pub eur: f64,
    /// The same step in the currency it actually happens in, if any.
    pub local: Option<(f64, Currency)>,
    pub tone: RowTone,
}

impl VerificationRow {
    /// `"<amount to 2 dp> <CUR>"`, or empty when the row has no local amount.
    pub fn local_label(&self) -> String {
        match self.local {
            Some((amount, currency)) => format!("{} {}", to_fixed(amount, 2), currency.code()),
            None => String::new(),
        }
    }
}

/// Walks from the sale price down to the target so the user can check every
/// deduction. The last row is the signed gap `net - target_with_notary`.
pub fn verification_rows(
    config: &ScenarioConfig,
    result: &CalculationResult,
) -> Vec<VerificationRow> {
    let target_base = config.new_apartment.target_base();
    let row = |label, eur, local, tone| VerificationRow {
        label,
        eur,
        local,
        tone,
    };

    vec![
        row(
            "Sale Price",
            result.sale_price,
            Some((result.sale_mdl, Currency::Mdl)),
            RowTone::Head,
        ),
        row(
            "Minus: Agent Fee",
            -result.agent_fee,
            Some((-result.agent_mdl, Currency::Mdl)),
            RowTone::Normal,
        ),
        row(
            "Minus: Tax",
            -result.tax,
            Some((-result.tax_mdl, Currency::Mdl)),
            RowTone::Normal,
        ),
        row(
            "Minus: Lost Rental",
            -result.lost_rental,
            Some((-result.lost_mdl, Currency::Mdl)),
            RowTone::Normal,
        ),
        row(
            "Net Before Conversion",
            result.net_before_conv,
            Some((result.net_before_conv_mdl, Currency::Mdl)),
            RowTone::HighlightBlue,
        ),
        row(
            "Minus: Conversion Fee",
            -result.conv_cost,
            Some((-result.conv_cost_mdl, Currency::Mdl)),
            RowTone::Normal,
        ),
        row(
            "Net After Conversion",
            result.net,
            Some((result.net_ron, Currency::Ron)),
            RowTone::HighlightGreen,
        ),
        row(
            "Minus: Notary Tax",
            -result.notary_tax,
            Some((-result.notary_tax_ron, Currency::Ron)),
            RowTone::Normal,
        ),
        row(
            "Required (Target)",
            target_base,
            Some((target_base * result.eur_to_ron, Currency::Ron)),
            RowTone::HighlightGreenSoft,
        ),
        row("Difference", result.net - result.target_with_notary, None, RowTone::Footer),
    ]
}

/// One line of the fees-and-taxes table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    pub description: &'static str,
    pub details: String,
    pub eur: f64,
}

pub fn cost_rows(config: &ScenarioConfig, result: &CalculationResult) -> Vec<CostRow> {
    vec![
        CostRow {
            description: "Agent Fee",
            details: format!("{}%", config.agent_fee.percentage),
            eur: result.agent_fee,
        },
        CostRow {
            description: "Income Tax",
            details: format!("{}%", config.income_tax.rate),
            eur: result.tax,
        },
        CostRow {
            description: "Lost Rental",
            details: format!("{} months", config.rental_income.months_lost),
            eur: result.lost_rental,
        },
        CostRow {
            description: "Conversion Fee",
            details: format!("{}%", to_fixed(result.conversion_pct, 4)),
            eur: result.conv_cost,
        },
        CostRow {
            description: "Notary Tax",
            details: format!("{}%", to_fixed(config.notary_tax.percentage, 1)),
            eur: result.notary_tax,
        },
    ]
}

/// How much one EUR loses (or gains) when routed EUR → RON → MDL instead of
/// EUR → MDL directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionExplainer {
    pub mdl_via_ron: f64,
    pub diff_per_eur: f64,
    /// `diff_per_eur` relative to the cross rate, in percent.
    pub pct: f64,
}

pub fn conversion_explainer(config: &ScenarioConfig) -> ConversionExplainer {
    let fx = &config.exchange_rates;
    let mdl_via_ron = fx.eur_to_ron * fx.ron_to_mdl;
    let diff_per_eur = mdl_via_ron - fx.eur_to_mdl;
    let pct = if mdl_via_ron > 0.0 {
        (diff_per_eur / mdl_via_ron) * 100.0
    } else {
        0.0
    };
    ConversionExplainer {
        mdl_via_ron,
        diff_per_eur,
        pct,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// Net after conversion covers less than 80% of the target.
    LowCover,
    /// The required sale price is above the market maximum for the surface.
    AboveMarketMax,
    /// The verification chain does not close within 1 EUR.
    VerificationGap,
}

impl Warning {
    pub fn message(&self) -> &'static str {
        match self {
            Warning::LowCover => {
                "Net after conversion covers less than 80% of the new apartment target."
            }
            Warning::AboveMarketMax => "Required sale price is above market MAX.",
            Warning::VerificationGap => {
                "Verification difference is notable, check fees & rates."
            }
        }
    }
}

/// Flags that deserve the user's attention. Error results produce none; the
/// error message itself is what gets shown.
pub fn warnings(config: &ScenarioConfig, result: &CalculationResult) -> Vec<Warning> {
    if result.is_error() {
        return Vec::new();
    }

    let mut out = Vec::new();
    if result.cover_pct < LOW_COVER_PCT {
        out.push(Warning::LowCover);
    }

    let old = &config.old_apartment;
    if let (Some(surface), Some(max)) = (old.surface_area_sqm, old.market_price_per_sqm_max) {
        if surface != 0.0 && max != 0.0 && result.sale_price > surface * max {
            out.push(Warning::AboveMarketMax);
        }
    }

    if result.verification_diff > NOTABLE_DIFF_EUR {
        out.push(Warning::VerificationGap);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute;
    use core_types::{
        AgentFee, CurrencyConversion, ExchangeRates, IncomeTax, NewApartment, NotaryTax,
        OldApartment, RentalIncome,
    };

    fn scenario() -> ScenarioConfig {
        ScenarioConfig {
            meta: None,
            new_apartment: NewApartment {
                price_apartment: 100000.0,
                price_parking: 10000.0,
                include_parking_in_calculation: false,
                ..NewApartment::default()
            },
            old_apartment: OldApartment {
                purchase_price: 50000.0,
                surface_area_sqm: Some(50.0),
                market_price_per_sqm_avg: Some(2000.0),
                market_price_per_sqm_max: Some(2500.0),
                ..OldApartment::default()
            },
            exchange_rates: ExchangeRates {
                eur_to_mdl: 19.5,
                eur_to_ron: 5.0,
                ron_to_mdl: 3.9,
            },
            currency_conversion: CurrencyConversion { enabled: false },
            notary_tax: NotaryTax {
                enabled: true,
                percentage: 1.0,
            },
            agent_fee: AgentFee {
                enabled: true,
                percentage: 3.0,
            },
            income_tax: IncomeTax {
                enabled: true,
                rate: 10.0,
            },
            rental_income: RentalIncome {
                enabled: true,
                monthly_amount: 500.0,
                months_lost: 3.0,
            },
        }
    }

    #[test]
    fn chain_ends_with_signed_difference() {
        let cfg = scenario();
        let r = compute(&cfg);
        let rows = verification_rows(&cfg, &r);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].label, "Sale Price");
        assert_eq!(rows[3].eur, -1500.0);
        assert_eq!(rows[8].eur, 100000.0);
        assert_eq!(rows[8].local, Some((500000.0, Currency::Ron)));

        let diff = rows.last().unwrap();
        assert_eq!(diff.tone, RowTone::Footer);
        assert_eq!(diff.local_label(), "");
        assert!(diff.eur.abs() < 1e-6);
    }

    #[test]
    fn local_labels_carry_currency() {
        let cfg = scenario();
        let r = compute(&cfg);
        let rows = verification_rows(&cfg, &r);
        assert_eq!(rows[3].local_label(), "-29250.00 MDL");
        assert!(rows[6].local_label().ends_with(" RON"));
    }

    #[test]
    fn cost_rows_describe_inputs() {
        let cfg = scenario();
        let r = compute(&cfg);
        let rows = cost_rows(&cfg, &r);
        let details: Vec<_> = rows.iter().map(|r| r.details.as_str()).collect();
        assert_eq!(details, ["3%", "10%", "3 months", "0.0000%", "1.0%"]);
        assert_eq!(rows[4].eur, 1000.0);
    }

    #[test]
    fn explainer_handles_missing_rates() {
        let mut cfg = scenario();
        let e = conversion_explainer(&cfg);
        assert!((e.mdl_via_ron - 19.5).abs() < 1e-12);

        cfg.exchange_rates.ron_to_mdl = 0.0;
        let e = conversion_explainer(&cfg);
        assert_eq!(e.pct, 0.0);
        assert_eq!(e.diff_per_eur, -19.5);
    }

    #[test]
    fn warns_above_market_max() {
        let cfg = scenario();
        let r = compute(&cfg);
        // 50 m² at 2500 €/m² is comfortably above the ~108.7k required.
        assert!(!warnings(&cfg, &r).contains(&Warning::AboveMarketMax));

        let mut tight = cfg.clone();
        tight.old_apartment.market_price_per_sqm_max = Some(1000.0);
        let r = compute(&tight);
        assert!(warnings(&tight, &r).contains(&Warning::AboveMarketMax));
    }

    #[test]
    fn warns_on_gap_and_low_cover() {
        let mut cfg = scenario();
        cfg.old_apartment.purchase_price = 1_000_000.0;
        let r = compute(&cfg);
        let w = warnings(&cfg, &r);
        assert!(w.contains(&Warning::LowCover));
        assert!(w.contains(&Warning::VerificationGap));
    }

    #[test]
    fn error_results_carry_no_warnings() {
        let mut cfg = scenario();
        cfg.agent_fee.percentage = 100.0;
        let r = compute(&cfg);
        assert!(r.is_error());
        assert!(warnings(&cfg, &r).is_empty());
    }
}
