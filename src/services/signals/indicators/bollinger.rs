//! Bollinger Bands indicator.

use super::series::{sma, stddev};
use super::{closes, Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// Bollinger Bands.
///
/// - Middle Band = SMA(20)
/// - Upper Band = Middle + 2 * population StdDev(20)
/// - Lower Band = Middle - 2 * population StdDev(20)
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Indicator for BollingerBands {
    fn id(&self) -> &str {
        "bollinger"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        let closes = closes(bars);
        let middle = sma(&closes, self.period);
        let deviation = stddev(&closes, self.period);

        let band = |sign: f64| -> Vec<Option<f64>> {
            middle
                .iter()
                .zip(&deviation)
                .map(|(m, d)| Some((*m)? + sign * self.std_dev_multiplier * (*d)?))
                .collect()
        };
        let upper = band(1.0);
        let lower = band(-1.0);

        vec![
            (IndicatorKey::BbLower, lower),
            (IndicatorKey::BbMiddle, middle),
            (IndicatorKey::BbUpper, upper),
        ]
    }
}
