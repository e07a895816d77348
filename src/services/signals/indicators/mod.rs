//! Technical indicator implementations and the enrichment pipeline.
//!
//! Each indicator derives one or more columns from the raw bars only; none of
//! them reads another indicator's output. Values are `None` until enough
//! history has accumulated, and wherever a formula would divide by zero.

pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod change;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod series;
pub mod sma;
pub mod stochastic;
pub mod williams;

pub use atr::Atr;
pub use bollinger::BollingerBands;
pub use cci::Cci;
pub use change::PercentChange;
pub use ema::Ema;
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::Stochastic;
pub use williams::WilliamsR;

use crate::types::{normalize_series, EnrichedBar, IndicatorFrame, IndicatorKey, IndicatorValues, OhlcvBar};

/// One derived column, in bar order.
pub type Column = (IndicatorKey, Vec<Option<f64>>);

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Number of bars required before any of the indicator's columns has a value.
    /// Shorter series are not computed at all.
    fn min_periods(&self) -> usize;

    /// Derive this indicator's columns. Every column has `bars.len()` entries.
    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column>;
}

/// The full indicator set, in pipeline order.
pub fn all_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Rsi::default()),
        Box::new(Macd::default()),
        Box::new(BollingerBands::default()),
        Box::new(Sma::new(20, IndicatorKey::Sma20)),
        Box::new(Sma::new(50, IndicatorKey::Sma50)),
        Box::new(Ema::new(9, IndicatorKey::Ema9)),
        Box::new(Ema::new(21, IndicatorKey::Ema21)),
        Box::new(Stochastic::default()),
        Box::new(Atr::default()),
        Box::new(WilliamsR::default()),
        Box::new(Cci::default()),
        Box::new(PercentChange::volume()),
        Box::new(PercentChange::price()),
    ]
}

/// The reduced set the scalper evaluates every cycle.
pub fn scalper_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Ema::new(9, IndicatorKey::Ema9)),
        Box::new(Ema::new(21, IndicatorKey::Ema21)),
        Box::new(Rsi::default()),
    ]
}

/// Sort, de-duplicate and enrich a series with the full indicator set.
pub fn enrich(bars: &[OhlcvBar]) -> IndicatorFrame {
    enrich_with(bars, &all_indicators())
}

/// Sort, de-duplicate and enrich a series with the given indicators only.
/// Columns not produced by `indicators` stay `None`.
pub fn enrich_with(bars: &[OhlcvBar], indicators: &[Box<dyn Indicator>]) -> IndicatorFrame {
    let bars = normalize_series(bars);
    let mut values = vec![IndicatorValues::default(); bars.len()];

    for indicator in indicators {
        if bars.len() < indicator.min_periods() {
            continue;
        }
        for (key, column) in indicator.compute(&bars) {
            debug_assert_eq!(column.len(), bars.len(), "{} column length", indicator.id());
            for (row, value) in values.iter_mut().zip(column) {
                row.set(key, value);
            }
        }
    }

    IndicatorFrame {
        rows: bars
            .into_iter()
            .zip(values)
            .map(|(bar, indicators)| EnrichedBar { bar, indicators })
            .collect(),
    }
}

/// Close prices as a gap-free column.
pub(crate) fn closes(bars: &[OhlcvBar]) -> Vec<Option<f64>> {
    bars.iter().map(|b| Some(b.close)).collect()
}
