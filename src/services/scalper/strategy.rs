//! EMA crossover filtered by RSI.

use crate::types::{EnrichedBar, TradeSide};

pub const BUY_REASON: &str = "EMA Gold Cross + RSI Bull";
pub const SELL_REASON: &str = "EMA Death Cross + RSI Bear";

/// Fast/slow EMA and RSI on one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
}

impl Snapshot {
    /// `None` while any of the three values is still warming up.
    pub fn from_row(row: &EnrichedBar) -> Option<Self> {
        let values = &row.indicators;
        Some(Self {
            ema_fast: values.ema_9?,
            ema_slow: values.ema_21?,
            rsi: values.rsi?,
        })
    }
}

/// Decide on the transition from `prev` to `last`.
///
/// Buy when the fast EMA crosses from at-or-below to above the slow EMA with
/// RSI above 50. Sell on the mirror crossing with RSI below 50.
pub fn decide(prev: &Snapshot, last: &Snapshot) -> Option<(TradeSide, &'static str)> {
    let crossed_up = prev.ema_fast <= prev.ema_slow && last.ema_fast > last.ema_slow;
    let crossed_down = prev.ema_fast >= prev.ema_slow && last.ema_fast < last.ema_slow;

    if crossed_up && last.rsi > 50.0 {
        Some((TradeSide::Buy, BUY_REASON))
    } else if crossed_down && last.rsi < 50.0 {
        Some((TradeSide::Sell, SELL_REASON))
    } else {
        None
    }
}
