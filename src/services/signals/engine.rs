//! Weighted aggregation of the factor readings into a prediction.

use tracing::debug;

use super::factors::{FACTORS, TOTAL_WEIGHT};
use super::indicators::enrich;
use crate::error::{AppError, Result};
use crate::types::{
    IndicatorFrame, OhlcvBar, OverallSignal, PredictedDirection, PredictionSnapshot, PriceRange,
    SignalJudgment,
};

/// Horizon the predicted range applies to.
pub const HORIZON: &str = "24h";

/// ATR fallback as a fraction of the close.
const ATR_FALLBACK_RATIO: f64 = 0.05;

/// Enrich a raw series and aggregate its last bar.
pub fn compute_snapshot(bars: &[OhlcvBar]) -> Result<PredictionSnapshot> {
    if bars.is_empty() {
        return Err(AppError::InvalidInput("empty OHLCV series".to_string()));
    }
    if let Some(bad) = bars.iter().find(|b| !b.is_finite()) {
        return Err(AppError::InvalidInput(format!(
            "malformed bar at timestamp {}",
            bad.timestamp
        )));
    }

    evaluate(&enrich(bars))
}

/// Aggregate the last row of an already enriched frame.
pub fn evaluate(frame: &IndicatorFrame) -> Result<PredictionSnapshot> {
    let last = frame
        .last()
        .ok_or_else(|| AppError::InvalidInput("empty OHLCV series".to_string()))?;
    let close = last.bar.close;

    let mut total_score = 0.0;
    let mut judgments = Vec::with_capacity(FACTORS.len());
    for factor in &FACTORS {
        let reading = factor.evaluate(last);
        total_score += reading.score * factor.weight as f64;
        judgments.push(SignalJudgment {
            indicator: factor.name.to_string(),
            value: round2(reading.value),
            verdict: reading.verdict,
            direction: reading.direction(),
            weight: factor.weight,
        });
    }

    let normalized = total_score / TOTAL_WEIGHT as f64 * 100.0;
    let confidence = 50.0 + normalized.abs() * 0.49;
    let overall_signal = OverallSignal::from_normalized(normalized);
    let predicted_direction = PredictedDirection::from_normalized(normalized);

    let atr = last
        .indicators
        .atr
        .filter(|atr| atr.is_finite() && *atr > 0.0)
        .unwrap_or_else(|| (close * ATR_FALLBACK_RATIO).abs());
    let predicted_range = price_range(close, atr, confidence, normalized);

    debug!(
        normalized = normalized,
        confidence = confidence,
        signal = overall_signal.label(),
        "Computed prediction snapshot"
    );

    let summary = format!(
        "The overall market sentiment for this coin is {} with a confidence of {:.1}%. {}",
        overall_signal.label(),
        confidence,
        predicted_direction.outlook()
    );

    Ok(PredictionSnapshot {
        overall_signal,
        confidence: round2(confidence),
        predicted_direction,
        predicted_range,
        horizon: HORIZON.to_string(),
        judgments,
        summary,
        normalized_score: round2(normalized),
        current_price: close,
    })
}

/// Volatility band around the close. The band widens with confidence and the
/// midpoint leans toward the normalized score.
fn price_range(close: f64, atr: f64, confidence: f64, normalized: f64) -> PriceRange {
    let spread = atr * (1.0 + confidence / 100.0);
    let low = close - spread;
    let high = close + spread;
    let mid = close + normalized / 100.0 * spread;

    let rounded = PriceRange {
        low: round2(low),
        mid: round2(mid),
        high: round2(high),
    };
    // Sub-cent prices would collapse to a single point.
    if rounded.low < rounded.high {
        rounded
    } else {
        PriceRange { low, mid, high }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
