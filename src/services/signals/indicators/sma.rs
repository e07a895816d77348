//! Simple Moving Average (SMA) indicator.

use super::series::sma;
use super::{closes, Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// SMA (Simple Moving Average) of closes over a fixed period.
pub struct Sma {
    period: usize,
    key: IndicatorKey,
}

impl Sma {
    pub fn new(period: usize, key: IndicatorKey) -> Self {
        Self { period, key }
    }
}

impl Indicator for Sma {
    fn id(&self) -> &str {
        self.key.name()
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        vec![(self.key, sma(&closes(bars), self.period))]
    }
}
