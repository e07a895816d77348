//! Trading signals service module.
//!
//! Enriches OHLCV series with technical indicators and folds the last bar
//! into a weighted nine-factor prediction.

pub mod engine;
pub mod factors;
pub mod indicators;

pub use engine::{compute_snapshot, evaluate, HORIZON};
pub use factors::{Factor, Reading, FACTORS, TOTAL_WEIGHT};
pub use indicators::{all_indicators, enrich, enrich_with, scalper_indicators, Indicator};
