use crate::error::ApiError;
use crate::responses::{MarketSummaryResponse, RatesResponse};
use crate::MarketApi;
use async_trait::async_trait;
use configuration::CacheSettings;
use core_types::{Currency, ScenarioConfig};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// A cached value and the instant it was fetched.
struct Entry<T> {
    value: T,
    fetched_at: Instant,
}

struct Slot<T> {
    ttl: Duration,
    entry: Mutex<Option<Entry<T>>>,
}

impl<T: Clone> Slot<T> {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Returns the cached value if it is still fresh, otherwise runs `fetch`
    /// and stores its successful result. The lock is held across the fetch so
    /// concurrent callers share one request.
    async fn get_or_fetch<F, Fut>(&self, name: &str, fetch: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>>,
    {
        let mut guard = self.entry.lock().await;
        if let Some(entry) = guard.as_ref() {
            if entry.fetched_at.elapsed() < self.ttl {
                tracing::trace!(cache = name, "hit");
                return Ok(entry.value.clone());
            }
        }
        tracing::debug!(cache = name, "miss, fetching");
        let value = fetch().await?;
        *guard = Some(Entry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    async fn clear(&self) {
        *self.entry.lock().await = None;
    }
}

/// Wraps any `MarketApi` with per-endpoint TTL caching of the JSON endpoints.
/// PDF exports always go through to the inner client.
pub struct CachedMarketApi<A> {
    inner: A,
    rates: Slot<RatesResponse>,
    market: Slot<MarketSummaryResponse>,
}

impl<A: MarketApi> CachedMarketApi<A> {
    pub fn new(inner: A, settings: &CacheSettings) -> Self {
        Self::with_ttls(inner, settings.rates_ttl, settings.market_ttl)
    }

    pub fn with_ttls(inner: A, rates_ttl: Duration, market_ttl: Duration) -> Self {
        Self {
            inner,
            rates: Slot::new(rates_ttl),
            market: Slot::new(market_ttl),
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Drops every cached response.
    pub async fn clear(&self) {
        self.rates.clear().await;
        self.market.clear().await;
    }
}

#[async_trait]
impl<A: MarketApi> MarketApi for CachedMarketApi<A> {
    async fn fetch_rates(&self) -> Result<RatesResponse, ApiError> {
        self.rates.get_or_fetch("rates", || self.inner.fetch_rates()).await
    }

    async fn fetch_market_summary(&self) -> Result<MarketSummaryResponse, ApiError> {
        self.market
            .get_or_fetch("market-summary", || self.inner.fetch_market_summary())
            .await
    }

    async fn export_report_pdf(&self, config: &ScenarioConfig) -> Result<Vec<u8>, ApiError> {
        self.inner.export_report_pdf(config).await
    }

    async fn export_sale_summary_pdf(
        &self,
        config: &ScenarioConfig,
        amount: f64,
        currency: Currency,
    ) -> Result<Vec<u8>, ApiError> {
        self.inner.export_sale_summary_pdf(config, amount, currency).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingApi {
        rates_calls: AtomicUsize,
        market_calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl MarketApi for CountingApi {
        async fn fetch_rates(&self) -> Result<RatesResponse, ApiError> {
            let n = self.rates_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Status {
                    status: 503,
                    body: "down".to_string(),
                });
            }
            Ok(RatesResponse {
                date: format!("call-{n}"),
                eur_to_mdl: 19.5,
                eur_to_mdl_label: String::new(),
                eur_to_ron: 5.0,
                eur_to_ron_label: String::new(),
                ron_to_mdl: 3.9,
                ron_to_mdl_label: String::new(),
            })
        }

        async fn fetch_market_summary(&self) -> Result<MarketSummaryResponse, ApiError> {
            self.market_calls.fetch_add(1, Ordering::SeqCst);
            Ok(MarketSummaryResponse {
                sources: Vec::new(),
                quartile_analysis: None,
            })
        }

        async fn export_report_pdf(&self, _: &ScenarioConfig) -> Result<Vec<u8>, ApiError> {
            Ok(b"%PDF".to_vec())
        }

        async fn export_sale_summary_pdf(
            &self,
            _: &ScenarioConfig,
            _: f64,
            _: Currency,
        ) -> Result<Vec<u8>, ApiError> {
            Ok(b"%PDF".to_vec())
        }
    }

    #[tokio::test]
    async fn fresh_entries_are_served_from_cache() {
        let api = CachedMarketApi::with_ttls(
            CountingApi::default(),
            Duration::from_secs(3600),
            Duration::from_secs(3600),
        );
        let first = api.fetch_rates().await.unwrap();
        let second = api.fetch_rates().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(api.inner().rates_calls.load(Ordering::SeqCst), 1);

        api.fetch_market_summary().await.unwrap();
        api.fetch_market_summary().await.unwrap();
        assert_eq!(api.inner().market_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_and_cleared_entries_are_refetched() {
        let api = CachedMarketApi::with_ttls(
            CountingApi::default(),
            Duration::ZERO,
            Duration::from_secs(3600),
        );
        api.fetch_rates().await.unwrap();
        api.fetch_rates().await.unwrap();
        assert_eq!(api.inner().rates_calls.load(Ordering::SeqCst), 2);

        api.fetch_market_summary().await.unwrap();
        api.clear().await;
        api.fetch_market_summary().await.unwrap();
        assert_eq!(api.inner().market_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let api = CachedMarketApi::with_ttls(
            CountingApi {
                fail: true,
                ..CountingApi::default()
            },
            Duration::from_secs(3600),
            Duration::from_secs(3600),
        );
        assert!(api.fetch_rates().await.is_err());
        assert!(api.fetch_rates().await.is_err());
        assert_eq!(api.inner().rates_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn pdfs_pass_through() {
        let api = CachedMarketApi::new(CountingApi::default(), &CacheSettings::default());
        let pdf = api.export_report_pdf(&ScenarioConfig::default()).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
