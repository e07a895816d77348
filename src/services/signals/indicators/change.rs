//! Period-over-period change of volume or close.

use super::series::pct_change;
use super::{Column, Indicator};
use crate::types::{IndicatorKey, OhlcvBar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Volume,
    Close,
}

/// Fractional change against the previous bar (0.25 = +25%).
pub struct PercentChange {
    field: Field,
}

impl PercentChange {
    pub fn volume() -> Self {
        Self {
            field: Field::Volume,
        }
    }

    pub fn price() -> Self {
        Self { field: Field::Close }
    }

    fn key(&self) -> IndicatorKey {
        match self.field {
            Field::Volume => IndicatorKey::VolChange,
            Field::Close => IndicatorKey::PriceChange,
        }
    }
}

impl Indicator for PercentChange {
    fn id(&self) -> &str {
        self.key().name()
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn compute(&self, bars: &[OhlcvBar]) -> Vec<Column> {
        let values: Vec<f64> = match self.field {
            Field::Volume => bars.iter().map(|b| b.volume).collect(),
            Field::Close => bars.iter().map(|b| b.close).collect(),
        };
        vec![(self.key(), pct_change(&values))]
    }
}
