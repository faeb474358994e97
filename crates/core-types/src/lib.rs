pub mod de;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Currency, Lang};
pub use error::CoreError;
pub use structs::{
    AgentFee, CurrencyConversion, ExchangeRates, IncomeTax, Meta, NewApartment, NotaryTax,
    OldApartment, RentalIncome, ScenarioConfig,
};
