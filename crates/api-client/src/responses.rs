use core_types::ScenarioConfig;
use serde::{Deserialize, Serialize};

/// The response from `GET /rates`: official rates plus their provenance labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesResponse {
    pub date: String,
    pub eur_to_mdl: f64,
    pub eur_to_mdl_label: String,
    pub eur_to_ron: f64,
    pub eur_to_ron_label: String,
    pub ron_to_mdl: f64,
    pub ron_to_mdl_label: String,
}

impl RatesResponse {
    /// Copies the three rates into the scenario. Labels are display-only.
    pub fn apply_to(&self, config: &mut ScenarioConfig) {
        config.exchange_rates.eur_to_mdl = self.eur_to_mdl;
        config.exchange_rates.eur_to_ron = self.eur_to_ron;
        config.exchange_rates.ron_to_mdl = self.ron_to_mdl;
    }
}

/// Aggregated statistics for one listing site, or `"all"` for the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    pub source: String,
    /// Listing URL for the source; `None` for the aggregate.
    pub url: Option<String>,
    pub total_ads: u64,
    pub min_price_per_sqm: f64,
    pub max_price_per_sqm: f64,
    pub avg_price_per_sqm: f64,
    pub median_price_per_sqm: f64,
    #[serde(default)]
    pub price_histogram: Vec<HistogramBin>,
}

impl MarketStats {
    /// Whether these statistics pool every source.
    pub fn is_aggregate(&self) -> bool {
        self.source == MarketSummaryResponse::AGGREGATE_SOURCE
    }

    /// Label of the most populated histogram bin.
    pub fn dominant_range(&self) -> Option<&str> {
        self.price_histogram
            .iter()
            .filter(|bin| bin.count > 0)
            .max_by_key(|bin| bin.count)
            .map(|bin| bin.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Price band, e.g. "1800-1900".
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

/// Outlier-trimmed quartiles of the price per m² across all sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuartileAnalysis {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
    #[serde(default)]
    pub outliers_removed: u64,
    #[serde(default)]
    pub outliers_percentage: f64,
    #[serde(default)]
    pub interpretation: QuartileInterpretation,
}

/// Human-readable descriptions produced by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuartileInterpretation {
    pub market_width: String,
    pub budget_range: String,
    pub affordable_range: String,
    pub mid_range: String,
    pub premium_range: String,
    pub price_range_description: String,
    pub iqr_description: String,
}

/// The response from `GET /market/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummaryResponse {
    pub sources: Vec<MarketStats>,
    #[serde(default)]
    pub quartile_analysis: Option<QuartileAnalysis>,
}

impl MarketSummaryResponse {
    pub const AGGREGATE_SOURCE: &'static str = "all";

    pub fn source(&self, name: &str) -> Option<&MarketStats> {
        self.sources.iter().find(|s| s.source == name)
    }

    pub fn aggregate(&self) -> Option<&MarketStats> {
        self.source(Self::AGGREGATE_SOURCE)
    }
}

/// Body of `POST /pdf`.
#[derive(Debug, Serialize)]
pub(crate) struct ReportPdfRequest<'a> {
    pub config: &'a ScenarioConfig,
}

/// Body of `POST /pdf/sale-summary`.
#[derive(Debug, Serialize)]
pub(crate) struct SaleSummaryPdfRequest<'a> {
    pub config: &'a ScenarioConfig,
    pub amount: f64,
    pub currency: core_types::Currency,
}
