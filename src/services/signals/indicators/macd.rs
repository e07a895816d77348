//! MACD (Moving Average Convergence Divergence) indicator.

use super::series::ema;
use super::{closes, Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        self.slow_period.max(self.fast_period)
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        let closes = closes(bars);
        let fast = ema(&closes, self.fast_period);
        let slow = ema(&closes, self.slow_period);

        let line: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ema(&line, self.signal_period);
        let histogram: Vec<Option<f64>> = line
            .iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        vec![
            (IndicatorKey::Macd, line),
            (IndicatorKey::MacdSignal, signal),
            (IndicatorKey::MacdHist, histogram),
        ]
    }
}
