//! The nine weighted factors that vote on the overall signal.
//!
//! Each factor reads only the last bar's derived values. Crosses (MACD, SMA,
//! EMA) are judged from the relative position of the two lines on that bar,
//! so a persisting state keeps firing on every evaluation.

use crate::types::{Direction, EnrichedBar, Verdict};

/// Outcome of one factor on one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Full-precision displayed value.
    pub value: f64,
    /// One of -1, -0.5, 0, 0.5, 1.
    pub score: f64,
    pub verdict: Verdict,
}

impl Reading {
    fn new(value: f64, score: f64, verdict: Verdict) -> Self {
        Self {
            value,
            score,
            verdict,
        }
    }

    fn neutral(value: f64) -> Self {
        Self::new(value, 0.0, Verdict::Neutral)
    }

    pub fn direction(&self) -> Direction {
        if self.score > 0.0 {
            Direction::Bull
        } else if self.score < 0.0 {
            Direction::Bear
        } else {
            Direction::Neutral
        }
    }
}

/// A named, weighted voting rule.
pub struct Factor {
    pub name: &'static str,
    pub weight: u32,
    evaluate: fn(&EnrichedBar) -> Reading,
}

impl Factor {
    pub fn evaluate(&self, row: &EnrichedBar) -> Reading {
        (self.evaluate)(row)
    }
}

/// Factors in evaluation (and output) order.
pub const FACTORS: [Factor; 9] = [
    Factor {
        name: "RSI (14)",
        weight: 20,
        evaluate: rsi,
    },
    Factor {
        name: "MACD (12,26,9)",
        weight: 25,
        evaluate: macd,
    },
    Factor {
        name: "Bollinger Bands",
        weight: 15,
        evaluate: bollinger,
    },
    Factor {
        name: "SMA Cross (20/50)",
        weight: 20,
        evaluate: sma_cross,
    },
    Factor {
        name: "EMA Cross (9/21)",
        weight: 10,
        evaluate: ema_cross,
    },
    Factor {
        name: "Stochastic",
        weight: 10,
        evaluate: stochastic,
    },
    Factor {
        name: "Volume Trend",
        weight: 15,
        evaluate: volume_trend,
    },
    Factor {
        name: "Williams %R",
        weight: 10,
        evaluate: williams,
    },
    Factor {
        name: "CCI (20)",
        weight: 10,
        evaluate: cci,
    },
];

/// Sum of all factor weights.
pub const TOTAL_WEIGHT: u32 = 135;

fn rsi(row: &EnrichedBar) -> Reading {
    let Some(rsi) = row.indicators.rsi else {
        return Reading::neutral(0.0);
    };

    if rsi < 30.0 {
        Reading::new(rsi, 1.0, Verdict::Oversold)
    } else if rsi > 70.0 {
        Reading::new(rsi, -1.0, Verdict::Overbought)
    } else if rsi < 50.0 {
        Reading::new(rsi, -0.5, Verdict::MildBearish)
    } else if rsi <= 70.0 {
        Reading::new(rsi, 0.5, Verdict::MildBullish)
    } else {
        Reading::neutral(rsi)
    }
}

fn macd(row: &EnrichedBar) -> Reading {
    let values = &row.indicators;
    let (Some(line), Some(signal), Some(hist)) = (values.macd, values.macd_signal, values.macd_hist)
    else {
        return Reading::neutral(values.macd_hist.unwrap_or(0.0));
    };

    if line > signal && hist > 0.0 {
        Reading::new(hist, 1.0, Verdict::BullishCross)
    } else if line < signal && hist < 0.0 {
        Reading::new(hist, -1.0, Verdict::BearishCross)
    } else {
        Reading::neutral(hist)
    }
}

fn bollinger(row: &EnrichedBar) -> Reading {
    let close = row.bar.close;
    let (Some(lower), Some(upper)) = (row.indicators.bb_lower, row.indicators.bb_upper) else {
        return Reading::neutral(close);
    };

    if close < lower {
        Reading::new(close, 1.0, Verdict::BelowLowerBand)
    } else if close > upper {
        Reading::new(close, -1.0, Verdict::AboveUpperBand)
    } else {
        Reading::neutral(close)
    }
}

fn sma_cross(row: &EnrichedBar) -> Reading {
    let (Some(fast), Some(slow)) = (row.indicators.sma_20, row.indicators.sma_50) else {
        return Reading::neutral(0.0);
    };
    line_position(fast, slow, Verdict::GoldenCross, Verdict::DeathCross)
}

fn ema_cross(row: &EnrichedBar) -> Reading {
    let (Some(fast), Some(slow)) = (row.indicators.ema_9, row.indicators.ema_21) else {
        return Reading::neutral(0.0);
    };
    line_position(fast, slow, Verdict::BullishTrend, Verdict::BearishTrend)
}

fn line_position(fast: f64, slow: f64, above: Verdict, below: Verdict) -> Reading {
    let spread = fast - slow;
    if fast > slow {
        Reading::new(spread, 1.0, above)
    } else if fast < slow {
        Reading::new(spread, -1.0, below)
    } else {
        Reading::neutral(spread)
    }
}

fn stochastic(row: &EnrichedBar) -> Reading {
    let Some(k) = row.indicators.stoch_k else {
        return Reading::neutral(0.0);
    };

    if k < 20.0 {
        Reading::new(k, 1.0, Verdict::Oversold)
    } else if k > 80.0 {
        Reading::new(k, -1.0, Verdict::Overbought)
    } else {
        Reading::neutral(k)
    }
}

fn volume_trend(row: &EnrichedBar) -> Reading {
    let (Some(volume), Some(price)) = (row.indicators.vol_change, row.indicators.price_change)
    else {
        return Reading::neutral(row.indicators.vol_change.unwrap_or(0.0));
    };

    if volume > 0.0 && price > 0.0 {
        Reading::new(volume, 1.0, Verdict::BullishVolume)
    } else if volume > 0.0 && price < 0.0 {
        Reading::new(volume, -1.0, Verdict::BearishVolume)
    } else {
        Reading::neutral(volume)
    }
}

fn williams(row: &EnrichedBar) -> Reading {
    let Some(willr) = row.indicators.willr else {
        return Reading::neutral(0.0);
    };

    if willr < -80.0 {
        Reading::new(willr, 1.0, Verdict::Oversold)
    } else if willr > -20.0 {
        Reading::new(willr, -1.0, Verdict::Overbought)
    } else {
        Reading::neutral(willr)
    }
}

fn cci(row: &EnrichedBar) -> Reading {
    let Some(cci) = row.indicators.cci else {
        return Reading::neutral(0.0);
    };

    if cci > 100.0 {
        Reading::new(cci, 1.0, Verdict::BullishMomentum)
    } else if cci < -100.0 {
        Reading::new(cci, -1.0, Verdict::BearishMomentum)
    } else {
        Reading::neutral(cci)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IndicatorValues, OhlcvBar};

    fn row(close: f64, indicators: IndicatorValues) -> EnrichedBar {
        EnrichedBar {
            bar: OhlcvBar::new(0, close, close, close, close, 1.0),
            indicators,
        }
    }

    fn factor(name: &str) -> &'static Factor {
        FACTORS.iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn test_weights_sum_to_total() {
        let sum: u32 = FACTORS.iter().map(|f| f.weight).sum();
        assert_eq!(sum, TOTAL_WEIGHT);
    }

    #[test]
    fn test_factor_order() {
        let names: Vec<&str> = FACTORS.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "RSI (14)",
                "MACD (12,26,9)",
                "Bollinger Bands",
                "SMA Cross (20/50)",
                "EMA Cross (9/21)",
                "Stochastic",
                "Volume Trend",
                "Williams %R",
                "CCI (20)",
            ]
        );
    }

    #[test]
    fn test_rsi_bands() {
        let rsi = factor("RSI (14)");
        let cases = [
            (29.99, 1.0, Verdict::Oversold),
            (30.0, -0.5, Verdict::MildBearish),
            (49.99, -0.5, Verdict::MildBearish),
            (50.0, 0.5, Verdict::MildBullish),
            (70.0, 0.5, Verdict::MildBullish),
            (70.01, -1.0, Verdict::Overbought),
        ];
        for (value, score, verdict) in cases {
            let reading = rsi.evaluate(&row(
                1.0,
                IndicatorValues {
                    rsi: Some(value),
                    ..Default::default()
                },
            ));
            assert_eq!(reading.score, score, "rsi {}", value);
            assert_eq!(reading.verdict, verdict, "rsi {}", value);
        }
    }

    #[test]
    fn test_missing_values_are_neutral() {
        let empty = row(100.0, IndicatorValues::default());
        for f in &FACTORS {
            let reading = f.evaluate(&empty);
            assert_eq!(reading.score, 0.0, "{}", f.name);
            assert_eq!(reading.verdict, Verdict::Neutral, "{}", f.name);
            assert_eq!(reading.direction(), Direction::Neutral);
        }
        // Bollinger still reports the close.
        assert_eq!(factor("Bollinger Bands").evaluate(&empty).value, 100.0);
    }

    #[test]
    fn test_macd_requires_line_and_histogram_agreement() {
        let macd = factor("MACD (12,26,9)");
        let bull = IndicatorValues {
            macd: Some(2.0),
            macd_signal: Some(1.0),
            macd_hist: Some(1.0),
            ..Default::default()
        };
        assert_eq!(macd.evaluate(&row(1.0, bull)).verdict, Verdict::BullishCross);

        let bear = IndicatorValues {
            macd: Some(-2.0),
            macd_signal: Some(-1.0),
            macd_hist: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(macd.evaluate(&row(1.0, bear)).verdict, Verdict::BearishCross);

        let mixed = IndicatorValues {
            macd: Some(2.0),
            macd_signal: Some(1.0),
            macd_hist: Some(0.0),
            ..Default::default()
        };
        let reading = macd.evaluate(&row(1.0, mixed));
        assert_eq!(reading.score, 0.0);
    }

    #[test]
    fn test_bollinger_outside_bands() {
        let bb = factor("Bollinger Bands");
        let bands = IndicatorValues {
            bb_lower: Some(90.0),
            bb_middle: Some(100.0),
            bb_upper: Some(110.0),
            ..Default::default()
        };
        assert_eq!(bb.evaluate(&row(89.0, bands)).verdict, Verdict::BelowLowerBand);
        assert_eq!(bb.evaluate(&row(111.0, bands)).verdict, Verdict::AboveUpperBand);
        assert_eq!(bb.evaluate(&row(90.0, bands)).verdict, Verdict::Neutral);
    }

    #[test]
    fn test_moving_average_crosses() {
        let sma = factor("SMA Cross (20/50)");
        let golden = IndicatorValues {
            sma_20: Some(105.0),
            sma_50: Some(100.0),
            ..Default::default()
        };
        let reading = sma.evaluate(&row(1.0, golden));
        assert_eq!(reading.verdict, Verdict::GoldenCross);
        assert_eq!(reading.value, 5.0);

        let ema = factor("EMA Cross (9/21)");
        let bearish = IndicatorValues {
            ema_9: Some(99.0),
            ema_21: Some(100.0),
            ..Default::default()
        };
        let reading = ema.evaluate(&row(1.0, bearish));
        assert_eq!(reading.verdict, Verdict::BearishTrend);
        assert_eq!(reading.direction(), Direction::Bear);

        let equal = IndicatorValues {
            ema_9: Some(100.0),
            ema_21: Some(100.0),
            ..Default::default()
        };
        assert_eq!(ema.evaluate(&row(1.0, equal)).verdict, Verdict::Neutral);
    }

    #[test]
    fn test_volume_trend() {
        let vt = factor("Volume Trend");
        let case = |vol: f64, price: f64| {
            vt.evaluate(&row(
                1.0,
                IndicatorValues {
                    vol_change: Some(vol),
                    price_change: Some(price),
                    ..Default::default()
                },
            ))
            .verdict
        };
        assert_eq!(case(0.5, 0.1), Verdict::BullishVolume);
        assert_eq!(case(0.5, -0.1), Verdict::BearishVolume);
        assert_eq!(case(-0.5, 0.1), Verdict::Neutral);
        assert_eq!(case(0.5, 0.0), Verdict::Neutral);
    }

    #[test]
    fn test_oscillator_thresholds() {
        let stoch = factor("Stochastic");
        let willr = factor("Williams %R");
        let cci = factor("CCI (20)");

        let with = |values: IndicatorValues| row(1.0, values);

        assert_eq!(
            stoch.evaluate(&with(IndicatorValues { stoch_k: Some(19.0), ..Default::default() })).verdict,
            Verdict::Oversold
        );
        assert_eq!(
            stoch.evaluate(&with(IndicatorValues { stoch_k: Some(80.0), ..Default::default() })).verdict,
            Verdict::Neutral
        );
        assert_eq!(
            willr.evaluate(&with(IndicatorValues { willr: Some(-85.0), ..Default::default() })).verdict,
            Verdict::Oversold
        );
        assert_eq!(
            willr.evaluate(&with(IndicatorValues { willr: Some(-10.0), ..Default::default() })).verdict,
            Verdict::Overbought
        );
        assert_eq!(
            cci.evaluate(&with(IndicatorValues { cci: Some(150.0), ..Default::default() })).verdict,
            Verdict::BullishMomentum
        );
        assert_eq!(
            cci.evaluate(&with(IndicatorValues { cci: Some(-100.0), ..Default::default() })).verdict,
            Verdict::Neutral
        );
    }
}
