use crate::de::{number, optional_number};
use crate::enums::Currency;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A complete "sell the old apartment, buy the new one" scenario.
///
/// This is the single input of the calculation engine. Its JSON shape is the one
/// produced by the form, by JSON imports and by `cfg=` URL fragments, so field
/// names are kept exactly as they appear on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub new_apartment: NewApartment,
    pub old_apartment: OldApartment,
    #[serde(default)]
    pub exchange_rates: ExchangeRates,
    #[serde(default)]
    pub currency_conversion: CurrencyConversion,
    #[serde(default)]
    pub notary_tax: NotaryTax,
    pub agent_fee: AgentFee,
    pub income_tax: IncomeTax,
    pub rental_income: RentalIncome,
}

/// Caller-owned metadata. Never read by any formula.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

/// The apartment being bought. Its price is the target the sale must cover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewApartment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub price_apartment: f64,
    #[serde(default, deserialize_with = "number")]
    pub price_parking: f64,
    #[serde(default)]
    pub include_parking_in_calculation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notary_country: Option<Currency>,
}

impl NewApartment {
    /// Apartment price plus parking, when parking is part of the deal.
    pub fn target_base(&self) -> f64 {
        self.price_apartment
            + if self.include_parking_in_calculation {
                self.price_parking
            } else {
                0.0
            }
    }
}

/// The apartment being sold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OldApartment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub purchase_price: f64,
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub surface_area_sqm: Option<f64>,
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub market_price_per_sqm_min: Option<f64>,
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub market_price_per_sqm_avg: Option<f64>,
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub market_price_per_sqm_max: Option<f64>,
    /// Single blended market price, used only when no explicit average is set.
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub market_price_per_sqm: Option<f64>,
}

/// Exchange rates. A rate of `0` means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    #[serde(default, deserialize_with = "number")]
    pub eur_to_mdl: f64,
    #[serde(default, deserialize_with = "number")]
    pub eur_to_ron: f64,
    #[serde(default, deserialize_with = "number")]
    pub ron_to_mdl: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConversion {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotaryTax {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "number")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentFee {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "number")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeTax {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "number")]
    pub rate: f64,
}

/// Rent that stops while the old apartment is on the market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalIncome {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "number")]
    pub monthly_amount: f64,
    #[serde(default, deserialize_with = "number")]
    pub months_lost: f64,
}

impl ScenarioConfig {
    /// Parses a scenario from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the form-level invariants: every number finite and non-negative.
    ///
    /// The engine itself never calls this; it normalizes instead of rejecting.
    pub fn validate(&self) -> Result<(), CoreError> {
        let na = &self.new_apartment;
        let oa = &self.old_apartment;
        let fx = &self.exchange_rates;

        let mut fields: Vec<(&str, f64)> = vec![
            ("new_apartment.price_apartment", na.price_apartment),
            ("new_apartment.price_parking", na.price_parking),
            ("old_apartment.purchase_price", oa.purchase_price),
            ("exchange_rates.eur_to_mdl", fx.eur_to_mdl),
            ("exchange_rates.eur_to_ron", fx.eur_to_ron),
            ("exchange_rates.ron_to_mdl", fx.ron_to_mdl),
            ("notary_tax.percentage", self.notary_tax.percentage),
            ("agent_fee.percentage", self.agent_fee.percentage),
            ("income_tax.rate", self.income_tax.rate),
            ("rental_income.monthly_amount", self.rental_income.monthly_amount),
            ("rental_income.months_lost", self.rental_income.months_lost),
        ];
        let optional = [
            ("old_apartment.surface_area_sqm", oa.surface_area_sqm),
            ("old_apartment.market_price_per_sqm_min", oa.market_price_per_sqm_min),
            ("old_apartment.market_price_per_sqm_avg", oa.market_price_per_sqm_avg),
            ("old_apartment.market_price_per_sqm_max", oa.market_price_per_sqm_max),
            ("old_apartment.market_price_per_sqm", oa.market_price_per_sqm),
        ];
        fields.extend(optional.iter().filter_map(|(name, v)| v.map(|v| (*name, v))));

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CoreError::InvalidInput(
                    name.to_string(),
                    "must be a finite number".to_string(),
                ));
            }
            if value < 0.0 {
                return Err(CoreError::InvalidInput(
                    name.to_string(),
                    format!("must be non-negative, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "new_apartment": {
                "price_apartment": 100000,
                "price_parking": 5000,
                "include_parking_in_calculation": false
            },
            "old_apartment": { "purchase_price": "40000" },
            "agent_fee": { "enabled": true, "percentage": 3 },
            "income_tax": { "enabled": false, "rate": 12 },
            "rental_income": { "enabled": false, "monthly_amount": 0, "months_lost": 0 }
        })
    }

    #[test]
    fn optional_sections_default_to_disabled() {
        let cfg: ScenarioConfig = serde_json::from_value(minimal()).unwrap();
        assert!(!cfg.currency_conversion.enabled);
        assert!(!cfg.notary_tax.enabled);
        assert_eq!(cfg.exchange_rates, ExchangeRates::default());
        assert_eq!(cfg.old_apartment.purchase_price, 40000.0);
        assert_eq!(cfg.old_apartment.surface_area_sqm, None);
    }

    #[test]
    fn target_base_respects_parking_flag() {
        let mut cfg: ScenarioConfig = serde_json::from_value(minimal()).unwrap();
        assert_eq!(cfg.new_apartment.target_base(), 100000.0);
        cfg.new_apartment.include_parking_in_calculation = true;
        assert_eq!(cfg.new_apartment.target_base(), 105000.0);
    }

    #[test]
    fn notary_country_uses_currency_codes() {
        let mut value = minimal();
        value["new_apartment"]["notary_country"] = json!("MDL");
        let cfg: ScenarioConfig = serde_json::from_value(value).unwrap();
        assert_eq!(cfg.new_apartment.notary_country, Some(Currency::Mdl));
    }

    #[test]
    fn validate_rejects_negative_values() {
        let mut cfg: ScenarioConfig = serde_json::from_value(minimal()).unwrap();
        assert!(cfg.validate().is_ok());

        cfg.old_apartment.surface_area_sqm = Some(-1.0);
        match cfg.validate() {
            Err(CoreError::InvalidInput(field, _)) => {
                assert_eq!(field, "old_apartment.surface_area_sqm")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let mut cfg: ScenarioConfig = serde_json::from_value(minimal()).unwrap();
        cfg.exchange_rates.eur_to_ron = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_scenario_is_empty_and_valid() {
        let cfg = ScenarioConfig::default();
        assert_eq!(cfg.meta, None);
        assert_eq!(cfg.new_apartment.target_base(), 0.0);
        assert!(!cfg.agent_fee.enabled);
        assert!(!cfg.rental_income.enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_required_section_is_a_parse_error() {
        let err = ScenarioConfig::from_json(r#"{"new_apartment": {}}"#).unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }
}
