//! # Homeswap Calculation Engine
//!
//! This crate answers one question: what is the minimum price the old apartment
//! must sell for so that, after every fee, tax, lost rent and currency
//! conversion, the proceeds cover the new apartment and its notary fee?
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `compute` takes a `ScenarioConfig` and produces a
//!   `CalculationResult`. No clock, no randomness, no I/O, so it is safe to call
//!   on every keystroke.
//!
//! ## Public API
//!
//! - `compute` / `SaleCalculator`: the closed-form sale price solver.
//! - `CalculationResult`: every figure the consumers render.
//! - `verification`, `benchmark`, `export`, `format`: read-only views over a result.

// Declare the modules that constitute this crate.
pub mod benchmark;
pub mod engine;
pub mod error;
pub mod export;
pub mod format;
pub mod report;
pub mod verification;

// Re-export the key components to create a clean, public-facing API.
pub use benchmark::{MarketBenchmark, MarketPosition, Quartiles};
pub use engine::{compute, SaleCalculator};
pub use error::CalcError;
pub use report::CalculationResult;
pub use verification::{CostRow, RowTone, VerificationRow, Warning};
