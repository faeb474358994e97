use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three currencies a scenario moves money through.
///
/// EUR is the primary currency of every calculation; MDL is where the old
/// apartment is sold and RON is where the new one is bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Ron,
    Mdl,
}

impl Currency {
    /// The ISO-style code, e.g. `"RON"`.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Ron => "RON",
            Currency::Mdl => "MDL",
        }
    }

    /// The symbol used when rendering amounts. Only EUR has a dedicated glyph.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Ron => "RON",
            Currency::Mdl => "MDL",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "RON" => Ok(Currency::Ron),
            "MDL" => Ok(Currency::Mdl),
            other => Err(CoreError::InvalidInput(
                "currency".to_string(),
                format!("unknown currency '{}'", other),
            )),
        }
    }
}

/// UI language preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ro,
}

impl FromStr for Lang {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "ro" => Ok(Lang::Ro),
            other => Err(CoreError::InvalidInput(
                "lang".to_string(),
                format!("unsupported language '{}'", other),
            )),
        }
    }
}
