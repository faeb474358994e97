use configuration::Preset;
use core_types::Lang;
use serde::{Deserialize, Serialize};

/// What just happened to the application state.
///
/// Serialized as `{"type": "...", "payload": ...}`, e.g.
/// `{"type":"PresetApplied","payload":"optimistic"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum StateEvent {
    /// The whole scenario was swapped (import, URL fragment).
    ConfigReplaced,
    /// Part of the scenario was edited in place.
    ConfigPatched,
    /// The stock scenario was restored.
    Reset,
    PresetApplied(Preset),
    LanguageChanged(Lang),
    ThemeChanged { dark: bool },
}
