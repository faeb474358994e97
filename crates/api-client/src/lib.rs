use crate::error::ApiError;
use crate::responses::{ReportPdfRequest, SaleSummaryPdfRequest};
use async_trait::async_trait;
use configuration::ApiSettings;
use core_types::{Currency, ScenarioConfig};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod cache;
pub mod error;
pub mod responses;
// --- Public API ---
pub use cache::CachedMarketApi;
pub use responses::{
    HistogramBin, MarketStats, MarketSummaryResponse, QuartileAnalysis, QuartileInterpretation,
    RatesResponse,
};

pub const RATES_PATH: &str = "/rates";
pub const MARKET_SUMMARY_PATH: &str = "/market/summary";
pub const REPORT_PDF_PATH: &str = "/pdf";
pub const SALE_SUMMARY_PDF_PATH: &str = "/pdf/sale-summary";

/// The abstract interface to the rates / market / PDF service.
/// Consumers hold a `dyn MarketApi` so the HTTP client, the caching wrapper
/// or a test double can be swapped in.
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// Fetches today's official EUR/MDL, EUR/RON and RON/MDL rates.
    async fn fetch_rates(&self) -> Result<RatesResponse, ApiError>;

    /// Fetches per-site listing statistics and the quartile analysis.
    async fn fetch_market_summary(&self) -> Result<MarketSummaryResponse, ApiError>;

    /// Renders the full report for `config` as a PDF.
    async fn export_report_pdf(&self, config: &ScenarioConfig) -> Result<Vec<u8>, ApiError>;

    /// Renders a one-page summary of an actual sale at `amount` in `currency`.
    async fn export_sale_summary_pdf(
        &self,
        config: &ScenarioConfig,
        amount: f64,
        currency: Currency,
    ) -> Result<Vec<u8>, ApiError>;
}

/// Checks the sale summary arguments before anything goes over the wire.
pub fn validate_sale_summary(amount: f64, currency: Currency) -> Result<(), ApiError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::InvalidInput(
            "Please enter a positive sale price.".to_string(),
        ));
    }
    if currency == Currency::Ron {
        return Err(ApiError::InvalidInput(
            "Sale summaries are issued in EUR or MDL only.".to_string(),
        ));
    }
    Ok(())
}

/// `MarketApi` over HTTP.
#[derive(Clone)]
pub struct HttpMarketClient {
    client: reqwest::Client,
    base_url: String,
    pdf_timeout: Duration,
}

impl HttpMarketClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            pdf_timeout: settings.pdf_timeout(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str::<T>(&text)?)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            })
        }
    }

    async fn post_pdf<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST (pdf)");
        let response = self
            .client
            .post(&url)
            .timeout(self.pdf_timeout)
            .json(body)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let body = response.text().await?;
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl MarketApi for HttpMarketClient {
    async fn fetch_rates(&self) -> Result<RatesResponse, ApiError> {
        self.get_json(RATES_PATH).await
    }

    async fn fetch_market_summary(&self) -> Result<MarketSummaryResponse, ApiError> {
        self.get_json(MARKET_SUMMARY_PATH).await
    }

    async fn export_report_pdf(&self, config: &ScenarioConfig) -> Result<Vec<u8>, ApiError> {
        self.post_pdf(REPORT_PDF_PATH, &ReportPdfRequest { config }).await
    }

    async fn export_sale_summary_pdf(
        &self,
        config: &ScenarioConfig,
        amount: f64,
        currency: Currency,
    ) -> Result<Vec<u8>, ApiError> {
        validate_sale_summary(amount, currency)?;
        let body = SaleSummaryPdfRequest {
            config,
            amount,
            currency,
        };
        self.post_pdf(SALE_SUMMARY_PDF_PATH, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sale_summary_arguments_are_checked_locally() {
        assert!(validate_sale_summary(95000.0, Currency::Eur).is_ok());
        assert!(validate_sale_summary(1_800_000.0, Currency::Mdl).is_ok());
        for amount in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                validate_sale_summary(amount, Currency::Eur),
                Err(ApiError::InvalidInput(_))
            ));
        }
        assert!(validate_sale_summary(1.0, Currency::Ron).is_err());
    }

    #[test]
    fn sale_summary_body_shape() {
        let config = ScenarioConfig::default();
        let body = SaleSummaryPdfRequest {
            config: &config,
            amount: 90000.0,
            currency: Currency::Mdl,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["currency"], json!("MDL"));
        assert_eq!(value["amount"], json!(90000.0));
        assert!(value["config"]["new_apartment"].is_object());
    }

    #[test]
    fn client_trims_trailing_slashes() {
        let settings = ApiSettings {
            base_url: "http://localhost:8000//".to_string(),
            ..ApiSettings::default()
        };
        let client = HttpMarketClient::new(&settings).unwrap();
        assert_eq!(client.url(RATES_PATH), "http://localhost:8000/rates");
    }

    #[test]
    fn market_summary_parses_service_payload() {
        let raw = json!({
            "sources": [
                {
                    "source": "proimobil.md",
                    "url": "https://proimobil.md",
                    "total_ads": 120,
                    "min_price_per_sqm": 1500.0,
                    "max_price_per_sqm": 2600.0,
                    "avg_price_per_sqm": 2050.0,
                    "median_price_per_sqm": 2000.0,
                    "price_histogram": [
                        { "label": "1800-1900", "count": 10, "percentage": 8.3 },
                        { "label": "1900-2000", "count": 25, "percentage": 20.8 },
                        { "label": "2600-2700", "count": 0, "percentage": 0.0 }
                    ]
                },
                {
                    "source": "all",
                    "url": null,
                    "total_ads": 200,
                    "min_price_per_sqm": 1400.0,
                    "max_price_per_sqm": 2700.0,
                    "avg_price_per_sqm": 2080.0,
                    "median_price_per_sqm": 2020.0
                }
            ],
            "quartile_analysis": {
                "q1": 1850.0, "q2": 2020.0, "q3": 2250.0, "iqr": 400.0,
                "outliers_removed": 4, "outliers_percentage": 2.0,
                "interpretation": { "market_width": "moderate" }
            }
        });
        let summary: MarketSummaryResponse = serde_json::from_value(raw).unwrap();
        let all = summary.aggregate().unwrap();
        assert_eq!(all.url, None);
        assert!(all.is_aggregate());
        assert!(!summary.source("proimobil.md").unwrap().is_aggregate());
        assert!(all.price_histogram.is_empty());
        assert_eq!(summary.source("proimobil.md").unwrap().dominant_range(), Some("1900-2000"));
        assert!(summary.source("999.md").is_none());

        let q = summary.quartile_analysis.unwrap();
        assert_eq!(q.q2, 2020.0);
        assert_eq!(q.interpretation.market_width, "moderate");
        assert_eq!(q.interpretation.iqr_description, "");
    }

    #[test]
    fn rates_overwrite_only_exchange_rates() {
        let rates = RatesResponse {
            date: "2025-01-15".to_string(),
            eur_to_mdl: 19.42,
            eur_to_mdl_label: "BNM".to_string(),
            eur_to_ron: 4.97,
            eur_to_ron_label: "BNR".to_string(),
            ron_to_mdl: 3.9,
            ron_to_mdl_label: "BNM".to_string(),
        };
        let mut config = ScenarioConfig::default();
        config.agent_fee.percentage = 4.0;
        rates.apply_to(&mut config);
        assert_eq!(config.exchange_rates.eur_to_mdl, 19.42);
        assert_eq!(config.exchange_rates.eur_to_ron, 4.97);
        assert_eq!(config.exchange_rates.ron_to_mdl, 3.9);
        assert_eq!(config.agent_fee.percentage, 4.0);
    }
}
