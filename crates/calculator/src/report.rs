use crate::error::CalcError;
use serde::{Deserialize, Serialize};

/// Every figure derived from a scenario.
///
/// This struct is the final output of the engine and the data transfer object
/// for the summary, verification tables, CSV and PDF exports. All amounts are in
/// EUR unless the field name says otherwise. Field names on the wire follow the
/// consumers (`salePrice`, `saleMDL`, `eur_to_mdl`, ...).
///
/// When `error` is set every numeric field is zero and nothing else may be trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    // I. Primary currency (EUR)
    pub sale_price: f64,
    pub agent_fee: f64,
    pub tax: f64,
    pub net: f64,
    pub target_with_notary: f64,
    pub notary_tax: f64,
    pub conv_cost: f64,
    pub net_before_conv: f64,
    pub profit: f64,
    pub lost_rental: f64,

    // II. MDL projections
    #[serde(rename = "saleMDL")]
    pub sale_mdl: f64,
    #[serde(rename = "agentMDL")]
    pub agent_mdl: f64,
    #[serde(rename = "taxMDL")]
    pub tax_mdl: f64,
    #[serde(rename = "lostMDL")]
    pub lost_mdl: f64,
    #[serde(rename = "netBeforeConvMDL")]
    pub net_before_conv_mdl: f64,
    #[serde(rename = "convCostMDL")]
    pub conv_cost_mdl: f64,

    // III. RON projections
    #[serde(rename = "saleRON")]
    pub sale_ron: f64,
    #[serde(rename = "notaryTaxRON")]
    pub notary_tax_ron: f64,
    #[serde(rename = "netRON")]
    pub net_ron: f64,

    // IV. Market comparison
    pub market_min: f64,
    pub market_avg: f64,
    pub market_max: f64,
    pub min_mp: f64,
    pub avg_mp: f64,
    pub max_mp: f64,
    /// Surface area of the old apartment, m².
    #[serde(rename = "s")]
    pub surface: f64,

    // V. Rates echoed back for display
    #[serde(rename = "eur_to_mdl")]
    pub eur_to_mdl: f64,
    #[serde(rename = "eur_to_ron")]
    pub eur_to_ron: f64,
    #[serde(rename = "ron_to_mdl")]
    pub ron_to_mdl: f64,

    /// Conversion coefficient as a percentage (0.9 means 0.9%), 0 when disabled.
    pub conversion_pct: f64,

    // VI. KPIs
    pub verification_diff: f64,
    pub cover_pct: f64,
    pub inv_return_pct: f64,
}

impl CalculationResult {
    /// The sentinel returned when the price equation has no valid solution.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Converts the sentinel form into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<Self, CalcError> {
        match self.error {
            Some(message) => Err(CalcError::InvalidCoefficients(message)),
            None => Ok(self),
        }
    }

    /// Every numeric field, in declaration order, paired with its wire name.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 33] {
        [
            ("salePrice", self.sale_price),
            ("agentFee", self.agent_fee),
            ("tax", self.tax),
            ("net", self.net),
            ("targetWithNotary", self.target_with_notary),
            ("notaryTax", self.notary_tax),
            ("convCost", self.conv_cost),
            ("netBeforeConv", self.net_before_conv),
            ("profit", self.profit),
            ("lostRental", self.lost_rental),
            ("saleMDL", self.sale_mdl),
            ("agentMDL", self.agent_mdl),
            ("taxMDL", self.tax_mdl),
            ("lostMDL", self.lost_mdl),
            ("netBeforeConvMDL", self.net_before_conv_mdl),
            ("convCostMDL", self.conv_cost_mdl),
            ("saleRON", self.sale_ron),
            ("notaryTaxRON", self.notary_tax_ron),
            ("netRON", self.net_ron),
            ("marketMin", self.market_min),
            ("marketAvg", self.market_avg),
            ("marketMax", self.market_max),
            ("minMp", self.min_mp),
            ("avgMp", self.avg_mp),
            ("maxMp", self.max_mp),
            ("s", self.surface),
            ("eur_to_mdl", self.eur_to_mdl),
            ("eur_to_ron", self.eur_to_ron),
            ("ron_to_mdl", self.ron_to_mdl),
            ("conversionPct", self.conversion_pct),
            ("verificationDiff", self.verification_diff),
            ("coverPct", self.cover_pct),
            ("invReturnPct", self.inv_return_pct),
        ]
    }
}
