//! # Homeswap Application State
//!
//! This crate owns the single mutable piece of the application: the scenario
//! being edited plus UI preferences. It is an explicit, injectable handle
//! (`AppStore`) rather than a global, so tests and alternative front-ends can
//! each run their own.
//!
//! Consumers observe changes through a `watch` channel (latest snapshot) and a
//! `broadcast` channel of `StateEvent`s. `UrlSync` mirrors the scenario into a
//! shareable URL fragment.

// Declare the modules that make up this crate.
pub mod error;
pub mod events;
pub mod store;
pub mod url_sync;

// Re-export the core types to provide a clean public API.
pub use error::StateError;
pub use events::StateEvent;
pub use store::{AppSnapshot, AppStore};
pub use url_sync::UrlSync;
