//! Williams %R indicator.

use super::series::{ratio, rolling_max, rolling_min};
use super::{Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

/// Williams %R.
///
/// %R = 100 * ((Close - Lowest Low) / (Highest High - Lowest Low) - 1)
///
/// Ranges from -100 (close at the period low) to 0 (close at the period high).
pub struct WilliamsR {
    period: usize,
}

impl Default for WilliamsR {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for WilliamsR {
    fn id(&self) -> &str {
        "willr"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let highest = rolling_max(&highs, self.period);
        let lowest = rolling_min(&lows, self.period);

        let values = bars
            .iter()
            .zip(highest.iter().zip(&lowest))
            .map(|(bar, (hh, ll))| {
                let (hh, ll) = ((*hh)?, (*ll)?);
                ratio(bar.close - ll, hh - ll).map(|position| 100.0 * (position - 1.0))
            })
            .collect();

        vec![(IndicatorKey::Willr, values)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_williams_extremes() {
        let bars = vec![
            OhlcvBar::new(0, 10.0, 12.0, 8.0, 10.0, 1.0),
            OhlcvBar::new(1, 10.0, 14.0, 9.0, 13.0, 1.0),
            OhlcvBar::new(2, 10.0, 11.0, 6.0, 6.0, 1.0),
            OhlcvBar::new(3, 10.0, 15.0, 7.0, 15.0, 1.0),
            OhlcvBar::new(4, 10.0, 15.0, 7.0, 10.5, 1.0),
        ];
        let columns = WilliamsR::new(3).compute(&bars);
        let values = &columns[0].1;
        assert_eq!(values[1], None);
        assert_eq!(values[2], Some(-100.0));
        assert_eq!(values[3], Some(0.0));
        // window 2..=4: high 15, low 6
        assert!((values[4].unwrap() - -50.0).abs() < 1e-9);
    }

    #[test]
    fn test_williams_zero_range_is_no_value() {
        let bars: Vec<OhlcvBar> = (0..20)
            .map(|i| OhlcvBar::new(i, 5.0, 5.0, 5.0, 5.0, 1.0))
            .collect();
        let columns = WilliamsR::default().compute(&bars);
        assert!(columns[0].1.iter().all(Option::is_none));
    }

    #[test]
    fn test_williams_first_value_index() {
        let bars: Vec<OhlcvBar> = (0..20)
            .map(|i| {
                let c = 50.0 + (i % 3) as f64;
                OhlcvBar::new(i, c, c + 1.0, c - 1.0, c, 1.0)
            })
            .collect();
        let columns = WilliamsR::default().compute(&bars);
        assert_eq!(columns[0].1.iter().position(Option::is_some), Some(13));
    }
}
