//! Stochastic Oscillator indicator.

use super::series::{ratio, rolling_max, rolling_min, sma};
use super::{Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// Stochastic Oscillator.
///
/// Compares closing price to price range over a period:
/// raw %K = (Close - Lowest Low) / (Highest High - Lowest Low) * 100
///
/// %K is raw %K smoothed with an SMA of `smooth_k`, %D is %K smoothed with an
/// SMA of `d_period`. A window with no range has no raw %K.
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    smooth_k: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
            smooth_k: 3,
        }
    }
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize, smooth_k: usize) -> Self {
        Self {
            k_period,
            d_period,
            smooth_k,
        }
    }

    fn raw_k(&self, bars: &[OhlcvBar]) -> Vec<Option<f64>> {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let highest = rolling_max(&highs, self.k_period);
        let lowest = rolling_min(&lows, self.k_period);

        bars.iter()
            .zip(highest.iter().zip(&lowest))
            .map(|(bar, (hh, ll))| {
                let (hh, ll) = ((*hh)?, (*ll)?);
                ratio(100.0 * (bar.close - ll), hh - ll)
            })
            .collect()
    }
}

impl Indicator for Stochastic {
    fn id(&self) -> &str {
        "stochastic"
    }

    fn min_periods(&self) -> usize {
        self.k_period + self.smooth_k - 1
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        let k = sma(&self.raw_k(bars), self.smooth_k);
        let d = sma(&k, self.d_period);
        vec![(IndicatorKey::StochK, k), (IndicatorKey::StochD, d)]
    }
}
