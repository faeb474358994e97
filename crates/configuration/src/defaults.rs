use core_types::{
    AgentFee, Currency, CurrencyConversion, ExchangeRates, IncomeTax, Meta, NewApartment,
    NotaryTax, OldApartment, RentalIncome, ScenarioConfig,
};

/// The stock scenario: a Bucharest purchase funded by selling a Chișinău flat.
///
/// Used on first start, by `reset`, and as the reference the presets scale from.
pub fn default_scenario() -> ScenarioConfig {
    ScenarioConfig {
        meta: Some(Meta {
            generated_at: Some(String::new()),
        }),
        new_apartment: NewApartment {
            address: Some(
                "str. Drumul Gura Gârliței nr. 56-62, ap. 7, sector 3, București, România"
                    .to_string(),
            ),
            price_apartment: 77189.0,
            price_parking: 8470.0,
            include_parking_in_calculation: true,
            notary_country: Some(Currency::Ron),
        },
        old_apartment: OldApartment {
            address: Some(
                "str-la 2 Florarii 4, ap. 228, Rascani, Chișinău, Republica Moldova".to_string(),
            ),
            purchase_price: 17800.0,
            surface_area_sqm: Some(50.2),
            market_price_per_sqm_min: Some(1800.0),
            market_price_per_sqm_avg: Some(2150.0),
            market_price_per_sqm_max: Some(2400.0),
            market_price_per_sqm: None,
        },
        exchange_rates: ExchangeRates {
            eur_to_mdl: 19.6497,
            eur_to_ron: 5.0845,
            ron_to_mdl: 3.9,
        },
        currency_conversion: CurrencyConversion { enabled: true },
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
        rental_income: RentalIncome {
            enabled: false,
            monthly_amount: 0.0,
            months_lost: 0.0,
        },
    }
}
