//! Scenario snapshots: JSON files and shareable URL fragments.
//!
//! A fragment is `cfg=<base64 of the UTF-8 JSON>`. Incoming fragments may
//! still carry the leading `#` and may have been percent-encoded by whatever
//! transported them.

use crate::error::ConfigError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use core_types::{Meta, ScenarioConfig};
use std::fs;
use std::path::Path;

pub const FRAGMENT_PREFIX: &str = "cfg=";

pub fn from_json(json: &str) -> Result<ScenarioConfig, ConfigError> {
    Ok(ScenarioConfig::from_json(json)?)
}

pub fn to_json_pretty(config: &ScenarioConfig) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(config)?)
}

pub fn from_file(path: impl AsRef<Path>) -> Result<ScenarioConfig, ConfigError> {
    let raw = fs::read_to_string(path.as_ref())?;
    from_json(&raw)
}

/// Writes `config` as pretty JSON, stamping `meta.generated_at` with the
/// current UTC time.
pub fn to_file(config: &ScenarioConfig, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let mut stamped = config.clone();
    stamped.meta = Some(Meta {
        generated_at: Some(chrono::Utc::now().to_rfc3339()),
    });
    fs::write(path.as_ref(), to_json_pretty(&stamped)?)?;
    tracing::info!(path = %path.as_ref().display(), "Scenario exported.");
    Ok(())
}

/// `cfg=<base64(json)>`, without the leading `#`.
pub fn encode_fragment(config: &ScenarioConfig) -> Result<String, ConfigError> {
    let json = serde_json::to_string(config)?;
    Ok(format!("{}{}", FRAGMENT_PREFIX, STANDARD.encode(json.as_bytes())))
}

pub fn decode_fragment(fragment: &str) -> Result<ScenarioConfig, ConfigError> {
    let trimmed = fragment.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let payload = trimmed.strip_prefix(FRAGMENT_PREFIX).unwrap_or(trimmed);
    let payload = urlencoding::decode(payload)
        .map_err(|e| ConfigError::Snapshot(format!("bad percent-encoding: {e}")))?;

    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| ConfigError::Snapshot(format!("bad base64: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| ConfigError::Snapshot(format!("payload is not UTF-8: {e}")))?;
    from_json(&json)
}
