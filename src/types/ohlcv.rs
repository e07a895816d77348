use serde::{Deserialize, Serialize};

/// One OHLCV record at a discrete time step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Epoch timestamp (milliseconds for exchange data, as delivered by the source).
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Sort bars by timestamp and drop duplicate timestamps.
///
/// When a timestamp appears more than once the last delivered bar wins.
pub fn normalize_series(bars: &[OhlcvBar]) -> Vec<OhlcvBar> {
    let mut sorted = bars.to_vec();
    // Stable sort keeps delivery order within equal timestamps.
    sorted.sort_by_key(|b| b.timestamp);

    let mut out: Vec<OhlcvBar> = Vec::with_capacity(sorted.len());
    for bar in sorted {
        match out.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}
