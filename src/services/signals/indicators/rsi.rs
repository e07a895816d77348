//! Relative Strength Index (RSI) indicator.

use super::series::{ratio, wilder};
use super::{Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses,
/// both smoothed with Wilder's average. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// A window with neither gains nor losses has no RSI.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI column for the given bars.
    pub fn values(&self, bars: &[OhlcvBar]) -> Vec<Option<f64>> {
        let mut gains = vec![None; bars.len()];
        let mut losses = vec![None; bars.len()];

        for i in 1..bars.len() {
            let change = bars[i].close - bars[i - 1].close;
            gains[i] = Some(change.max(0.0));
            losses[i] = Some((-change).max(0.0));
        }

        let avg_gain = wilder(&gains, self.period);
        let avg_loss = wilder(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(gain, loss)| match (gain, loss) {
                (Some(g), Some(l)) => ratio(100.0 * g, g + l),
                _ => None,
            })
            .collect()
    }
}

impl Indicator for Rsi {
    fn id(&self) -> &str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        vec![(IndicatorKey::Rsi, self.values(bars))]
    }
}
