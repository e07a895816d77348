//! Commodity Channel Index (CCI) indicator.

use super::series::{ratio, sma};
use super::{Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// CCI (Commodity Channel Index) indicator.
///
/// Measures the current price level relative to an average price level:
/// CCI = (TP - SMA(TP)) / (0.015 * Mean Deviation)
/// where TP = Typical Price = (High + Low + Close) / 3
pub struct Cci {
    period: usize,
}

impl Default for Cci {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// Lambert's constant; scales roughly 70-80% of readings into [-100, 100].
const CCI_CONSTANT: f64 = 0.015;

impl Cci {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate mean deviation.
    fn mean_deviation(values: &[f64], mean: f64) -> f64 {
        values.iter().map(|v| (v - mean).abs()).sum::<f64>() / values.len() as f64
    }
}

impl Indicator for Cci {
    fn id(&self) -> &str {
        "cci"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        let typical: Vec<f64> = bars.iter().map(OhlcvBar::typical_price).collect();
        let wrapped: Vec<Option<f64>> = typical.iter().copied().map(Some).collect();
        let mean = sma(&wrapped, self.period);

        let values = mean
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let m = (*m)?;
                let window = &typical[i + 1 - self.period..=i];
                let deviation = Self::mean_deviation(window, m);
                ratio(typical[i] - m, CCI_CONSTANT * deviation)
            })
            .collect();

        vec![(IndicatorKey::Cci, values)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_bar(i: i64, price: f64) -> OhlcvBar {
        OhlcvBar::new(i, price, price, price, price, 1.0)
    }

    #[test]
    fn test_cci_known_value() {
        // TP = 1, 2, 3: mean 2, mean deviation 2/3
        let bars = vec![flat_bar(0, 1.0), flat_bar(1, 2.0), flat_bar(2, 3.0)];
        let columns = Cci::new(3).compute(&bars);
        let values = &columns[0].1;
        assert_eq!(values[1], None);
        assert!((values[2].unwrap() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_cci_falling_is_negative() {
        let bars: Vec<OhlcvBar> = (0..30).map(|i| flat_bar(i, 200.0 - i as f64)).collect();
        let columns = Cci::default().compute(&bars);
        assert!(columns[0].1[29].unwrap() < -100.0);
    }

    #[test]
    fn test_cci_zero_deviation_is_no_value() {
        let bars: Vec<OhlcvBar> = (0..25).map(|i| flat_bar(i, 42.0)).collect();
        let columns = Cci::default().compute(&bars);
        assert!(columns[0].1.iter().all(Option::is_none));
    }
}
