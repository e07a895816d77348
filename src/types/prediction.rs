use serde::{Deserialize, Serialize};

/// Which way a single factor leans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bull,
    Bear,
    Neutral,
}

/// Indicator-specific reading attached to a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Neutral,
    Oversold,
    Overbought,
    #[serde(rename = "Mild Bearish")]
    MildBearish,
    #[serde(rename = "Mild Bullish")]
    MildBullish,
    #[serde(rename = "Bullish Cross")]
    BullishCross,
    #[serde(rename = "Bearish Cross")]
    BearishCross,
    #[serde(rename = "Below Lower Band")]
    BelowLowerBand,
    #[serde(rename = "Above Upper Band")]
    AboveUpperBand,
    #[serde(rename = "Golden Cross")]
    GoldenCross,
    #[serde(rename = "Death Cross")]
    DeathCross,
    #[serde(rename = "Bullish Trend")]
    BullishTrend,
    #[serde(rename = "Bearish Trend")]
    BearishTrend,
    #[serde(rename = "Bullish Volume")]
    BullishVolume,
    #[serde(rename = "Bearish Volume")]
    BearishVolume,
    #[serde(rename = "Bullish Momentum")]
    BullishMomentum,
    #[serde(rename = "Bearish Momentum")]
    BearishMomentum,
}

impl Verdict {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Neutral => "Neutral",
            Self::Oversold => "Oversold",
            Self::Overbought => "Overbought",
            Self::MildBearish => "Mild Bearish",
            Self::MildBullish => "Mild Bullish",
            Self::BullishCross => "Bullish Cross",
            Self::BearishCross => "Bearish Cross",
            Self::BelowLowerBand => "Below Lower Band",
            Self::AboveUpperBand => "Above Upper Band",
            Self::GoldenCross => "Golden Cross",
            Self::DeathCross => "Death Cross",
            Self::BullishTrend => "Bullish Trend",
            Self::BearishTrend => "Bearish Trend",
            Self::BullishVolume => "Bullish Volume",
            Self::BearishVolume => "Bearish Volume",
            Self::BullishMomentum => "Bullish Momentum",
            Self::BearishMomentum => "Bearish Momentum",
        }
    }
}

/// One factor's contribution to a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalJudgment {
    /// Indicator label, e.g. "RSI (14)".
    pub indicator: String,
    /// Displayed reading, rounded to 2 decimals.
    pub value: f64,
    pub verdict: Verdict,
    pub direction: Direction,
    pub weight: u32,
}

/// Overall verdict of the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallSignal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl OverallSignal {
    /// Map a normalized score (-100..=100) to a signal.
    pub fn from_normalized(score: f64) -> Self {
        if score >= 60.0 {
            Self::StrongBuy
        } else if score >= 20.0 {
            Self::Buy
        } else if score <= -60.0 {
            Self::StrongSell
        } else if score <= -20.0 {
            Self::Sell
        } else {
            Self::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        }
    }
}

/// Expected price direction over the prediction horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictedDirection {
    Up,
    Down,
    Sideways,
}

impl PredictedDirection {
    pub fn from_normalized(score: f64) -> Self {
        if score > 20.0 {
            Self::Up
        } else if score < -20.0 {
            Self::Down
        } else {
            Self::Sideways
        }
    }

    /// Closing sentence of the prediction summary.
    pub fn outlook(&self) -> &'static str {
        match self {
            Self::Up => "Technical indicators suggest an upward momentum in the short term.",
            Self::Down => {
                "Indicators point towards a bearish trend, suggesting potential price drops."
            }
            Self::Sideways => {
                "The market is currently showing mixed signals, suggesting sideways movement."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

/// Aggregated prediction for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSnapshot {
    pub overall_signal: OverallSignal,
    /// 50..=99
    pub confidence: f64,
    pub predicted_direction: PredictedDirection,
    pub predicted_range: PriceRange,
    pub horizon: String,
    /// Always nine entries, in factor order.
    pub judgments: Vec<SignalJudgment>,
    pub summary: String,
    /// Weighted score scaled to -100..=100.
    pub normalized_score: f64,
    pub current_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_signal_thresholds() {
        assert_eq!(OverallSignal::from_normalized(60.0), OverallSignal::StrongBuy);
        assert_eq!(OverallSignal::from_normalized(59.9), OverallSignal::Buy);
        assert_eq!(OverallSignal::from_normalized(20.0), OverallSignal::Buy);
        assert_eq!(OverallSignal::from_normalized(19.9), OverallSignal::Neutral);
        assert_eq!(OverallSignal::from_normalized(-19.9), OverallSignal::Neutral);
        assert_eq!(OverallSignal::from_normalized(-20.0), OverallSignal::Sell);
        assert_eq!(OverallSignal::from_normalized(-60.0), OverallSignal::StrongSell);
    }

    #[test]
    fn test_predicted_direction_is_strict() {
        assert_eq!(PredictedDirection::from_normalized(20.0), PredictedDirection::Sideways);
        assert_eq!(PredictedDirection::from_normalized(20.1), PredictedDirection::Up);
        assert_eq!(PredictedDirection::from_normalized(-20.0), PredictedDirection::Sideways);
        assert_eq!(PredictedDirection::from_normalized(-20.1), PredictedDirection::Down);
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(
            serde_json::to_string(&OverallSignal::StrongBuy).unwrap(),
            "\"STRONG_BUY\""
        );
        assert_eq!(
            serde_json::to_string(&Verdict::GoldenCross).unwrap(),
            "\"Golden Cross\""
        );
        assert_eq!(serde_json::to_string(&Direction::Bull).unwrap(), "\"bull\"");
        assert_eq!(
            serde_json::to_string(&PredictedDirection::Sideways).unwrap(),
            "\"SIDEWAYS\""
        );
    }

    #[test]
    fn test_verdict_label_matches_serde() {
        let verdicts = [
            Verdict::Neutral,
            Verdict::MildBearish,
            Verdict::BelowLowerBand,
            Verdict::BearishMomentum,
        ];
        for v in verdicts {
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, format!("\"{}\"", v.label()));
        }
    }
}
