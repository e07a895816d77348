//! Average True Range (ATR) indicator.

use super::series::wilder;
use super::{Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// ATR (Average True Range) indicator.
///
/// Measures market volatility by averaging true ranges with Wilder's smoothing:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// The first bar has no previous close and therefore no true range.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate True Range.
    fn true_range(current: &OhlcvBar, previous: &OhlcvBar) -> f64 {
        let hl = current.high - current.low;
        let hc = (current.high - previous.close).abs();
        let lc = (current.low - previous.close).abs();
        hl.max(hc).max(lc)
    }
}

impl Indicator for Atr {
    fn id(&self) -> &str {
        "atr"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        let mut true_ranges = vec![None; bars.len()];
        for i in 1..bars.len() {
            true_ranges[i] = Some(Self::true_range(&bars[i], &bars[i - 1]));
        }
        vec![(IndicatorKey::Atr, wilder(&true_ranges, self.period))]
    }
}
