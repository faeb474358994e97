use crate::store::{AppSnapshot, AppStore};
use configuration::snapshot::{decode_fragment, encode_fragment, FRAGMENT_PREFIX};
use tokio::sync::watch;

/// Keeps a shareable URL fragment (`cfg=<base64 json>`) in step with the store.
pub struct UrlSync {
    rx: watch::Receiver<AppSnapshot>,
    last: Option<String>,
}

impl UrlSync {
    /// Applies `incoming` (the current location hash, `#` optional) to the
    /// store when it carries a `cfg=` payload, then starts tracking the store.
    ///
    /// A malformed payload is logged and ignored; the store keeps its state.
    pub fn init(store: &AppStore, incoming: Option<&str>) -> Self {
        if let Some(hash) = incoming {
            let hash = hash.strip_prefix('#').unwrap_or(hash);
            if hash.starts_with(FRAGMENT_PREFIX) {
                match decode_fragment(hash) {
                    Ok(config) => store.replace_config(config),
                    Err(e) => tracing::warn!(error = %e, "Ignoring malformed URL fragment."),
                }
            }
        }
        Self {
            rx: store.subscribe(),
            last: None,
        }
    }

    /// Returns the fragment for the latest snapshot if it differs from the
    /// last one handed out.
    pub fn poll(&mut self) -> Option<String> {
        let encoded = {
            let snapshot = self.rx.borrow_and_update();
            encode_fragment(&snapshot.config)
        };
        match encoded {
            Ok(fragment) if self.last.as_deref() != Some(fragment.as_str()) => {
                self.last = Some(fragment.clone());
                Some(fragment)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode URL fragment.");
                None
            }
        }
    }

    /// Emits the current fragment, then one per effective change, until every
    /// store handle has been dropped.
    pub async fn run<F>(mut self, mut sink: F)
    where
        F: FnMut(String),
    {
        loop {
            if let Some(fragment) = self.poll() {
                sink(fragment);
            }
            if self.rx.changed().await.is_err() {
                tracing::debug!("Store dropped, URL sync stopping.");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::default_scenario;

    #[test]
    fn incoming_fragment_replaces_the_scenario() {
        let mut shared = default_scenario();
        shared.agent_fee.percentage = 2.5;
        let fragment = encode_fragment(&shared).unwrap();

        let store = AppStore::default();
        let hash = format!("#{fragment}");
        let _sync = UrlSync::init(&store, Some(hash.as_str()));
        assert_eq!(store.config(), shared);
    }

    #[test]
    fn malformed_or_foreign_hashes_are_ignored() {
        let store = AppStore::default();
        let _a = UrlSync::init(&store, Some("#cfg=!!!"));
        let _b = UrlSync::init(&store, Some("#section-costs"));
        assert_eq!(store.config(), default_scenario());
    }

    #[test]
    fn poll_emits_only_on_change() {
        let store = AppStore::default();
        let mut sync = UrlSync::init(&store, None);

        let first = sync.poll().unwrap();
        assert!(first.starts_with("cfg="));
        assert_eq!(sync.poll(), None);

        // A preference change does not alter the fragment.
        store.toggle_dark();
        assert_eq!(sync.poll(), None);

        store.patch_config(|c| c.income_tax.rate = 10.0);
        let second = sync.poll().unwrap();
        assert_ne!(first, second);
    }
}
