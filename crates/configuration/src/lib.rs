use crate::error::ConfigError;
use crate::settings::AppSettings;

// Declare the modules that make up this crate.
pub mod defaults;
pub mod error;
pub mod logging;
pub mod presets;
pub mod settings;
pub mod snapshot;

// Re-export the core types to provide a clean public API.
pub use defaults::default_scenario;
pub use logging::init_tracing;
pub use presets::{Preset, PresetParams};
pub use settings::{ApiSettings, CacheSettings, LoggingSettings, StateSettings};

/// Base name of the optional settings file (`homeswap.toml`).
pub const SETTINGS_FILE: &str = "homeswap";

/// Prefix of environment overrides, e.g. `HOMESWAP__API__BASE_URL`.
pub const ENV_PREFIX: &str = "HOMESWAP";

/// Loads the application settings from `homeswap.toml` and the environment.
///
/// This function is the primary entry point for this crate. The file is optional;
/// environment variables (after a `.env` file, if any, has been loaded) override it.
pub fn load_settings() -> Result<AppSettings, ConfigError> {
    dotenvy::dotenv().ok();
    load_settings_from(SETTINGS_FILE)
}

/// Same as [`load_settings`] with an explicit file path (extension optional),
/// and without touching `.env`.
pub fn load_settings_from(path: &str) -> Result<AppSettings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let mut settings = builder.try_deserialize::<AppSettings>()?;
    validate(&mut settings)?;
    Ok(settings)
}

fn validate(settings: &mut AppSettings) -> Result<(), ConfigError> {
    let trimmed = settings.api.base_url.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.base_url must not be empty".to_string(),
        ));
    }
    settings.api.base_url = trimmed.to_string();

    if settings.api.timeout.is_zero() {
        return Err(ConfigError::ValidationError(
            "api.timeout must be greater than zero".to_string(),
        ));
    }
    if settings.api.pdf_timeout_factor == 0 {
        return Err(ConfigError::ValidationError(
            "api.pdf_timeout_factor must be at least 1".to_string(),
        ));
    }
    Ok(())
}
