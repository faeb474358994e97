use thiserror::Error;

/// Message carried by the result when the price equation degenerates.
pub const INVALID_COEFFICIENTS_MSG: &str =
    "Coefficients (agent/tax/convert) produce denom=0; adjust percentages.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Agent, tax and conversion coefficients leave a non-positive denominator,
    /// so no finite sale price can cover the target.
    #[error("{0}")]
    InvalidCoefficients(String),

    #[error("Failed to write export: {0}")]
    Export(String),
}

impl From<csv::Error> for CalcError {
    fn from(err: csv::Error) -> Self {
        CalcError::Export(err.to_string())
    }
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::Export(err.to_string())
    }
}
