use crate::error::StateError;
use crate::events::StateEvent;
use calculator::{compute, CalculationResult};
use configuration::{default_scenario, Preset};
use core_types::{Lang, ScenarioConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Everything the application remembers between interactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub config: ScenarioConfig,
    #[serde(default)]
    pub lang: Lang,
    #[serde(default)]
    pub dark: bool,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        Self {
            config: default_scenario(),
            lang: Lang::default(),
            dark: false,
        }
    }
}

struct Inner {
    state: watch::Sender<AppSnapshot>,
    events: broadcast::Sender<StateEvent>,
}

/// Shared handle to the application state.
///
/// Cloning is cheap and every clone sees the same state. Each mutation
/// publishes the new snapshot on a `watch` channel and an event on a
/// `broadcast` channel; having no subscribers is not an error.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<Inner>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(AppSnapshot::default())
    }
}

impl AppStore {
    pub fn new(snapshot: AppSnapshot) -> Self {
        let (state, _) = watch::channel(snapshot);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner { state, events }),
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn config(&self) -> ScenarioConfig {
        self.inner.state.borrow().config.clone()
    }

    /// Edits the scenario in place.
    pub fn patch_config<F>(&self, patch: F)
    where
        F: FnOnce(&mut ScenarioConfig),
    {
        self.inner.state.send_modify(|s| patch(&mut s.config));
        self.emit(StateEvent::ConfigPatched);
    }

    pub fn replace_config(&self, config: ScenarioConfig) {
        self.inner.state.send_modify(|s| s.config = config);
        self.emit(StateEvent::ConfigReplaced);
    }

    /// Restores the stock scenario. Language and theme are kept.
    pub fn reset(&self) {
        self.inner.state.send_modify(|s| s.config = default_scenario());
        self.emit(StateEvent::Reset);
    }

    pub fn apply_preset(&self, preset: Preset) {
        self.inner.state.send_modify(|s| s.config = preset.apply(&s.config));
        self.emit(StateEvent::PresetApplied(preset));
    }

    pub fn set_lang(&self, lang: Lang) {
        self.inner.state.send_modify(|s| s.lang = lang);
        self.emit(StateEvent::LanguageChanged(lang));
    }

    /// Flips the theme and returns the new value.
    pub fn toggle_dark(&self) -> bool {
        let mut dark = false;
        self.inner.state.send_modify(|s| {
            s.dark = !s.dark;
            dark = s.dark;
        });
        self.emit(StateEvent::ThemeChanged { dark });
        dark
    }

    /// Receives every new snapshot; starts with the current one marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<StateEvent> {
        self.inner.events.subscribe()
    }

    /// Runs the engine on the current scenario.
    pub fn calculate(&self) -> CalculationResult {
        compute(&self.inner.state.borrow().config)
    }

    /// Restores a store persisted with [`AppStore::save_to`]. A missing file
    /// yields the default state; a corrupt one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No saved state, starting from defaults.");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let snapshot: AppSnapshot = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "State restored.");
        Ok(Self::new(snapshot))
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    fn emit(&self, event: StateEvent) {
        tracing::trace!(?event, "State changed.");
        let _ = self.inner.events.send(event);
    }
}
