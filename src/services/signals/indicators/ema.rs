//! Exponential Moving Average (EMA) indicator.

use super::series::ema;
use super::{closes, Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// EMA (Exponential Moving Average) of closes.
///
/// Like SMA but gives more weight to recent prices (factor 2/(n+1)).
/// The first value is the SMA of the first `period` closes.
pub struct Ema {
    period: usize,
    key: IndicatorKey,
}

impl Ema {
    pub fn new(period: usize, key: IndicatorKey) -> Self {
        Self { period, key }
    }
}

impl Indicator for Ema {
    fn id(&self) -> &str {
        self.key.name()
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        vec![(self.key, ema(&closes(bars), self.period))]
    }
}
