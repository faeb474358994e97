use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `homeswap.toml`; missing keys take the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
    pub state: StateSettings,
}

/// Where the rates / market / PDF service lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Service root, without a trailing slash (e.g. "http://localhost:8000").
    pub base_url: String,
    /// Per-request timeout for JSON endpoints.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// PDF rendering is slow; its timeout is `timeout * pdf_timeout_factor`.
    pub pdf_timeout_factor: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(10),
            pdf_timeout_factor: 3,
        }
    }
}

impl ApiSettings {
    pub fn pdf_timeout(&self) -> Duration {
        self.timeout * self.pdf_timeout_factor
    }
}

/// Time-to-live of the client-side response caches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    #[serde(with = "humantime_serde")]
    pub market_ttl: Duration,
    #[serde(with = "humantime_serde")]
    pub rates_ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            market_ttl: Duration::from_secs(30 * 60),
            rates_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// JSON file the application state is persisted to between runs.
    pub path: Option<PathBuf>,
}
