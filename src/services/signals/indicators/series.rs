//! Column helpers shared by the indicator implementations.
//!
//! Every helper maps an input column to an output column of the same length.
//! `None` in the input is treated as a gap: windows that touch a gap produce
//! `None`, and recursive smoothers restart their seed after one.

/// Simple moving average over `period` defined values.
pub fn sma(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| {
        Some(window.iter().sum::<f64>() / window.len() as f64)
    })
}

/// Population standard deviation over `period` values.
pub fn stddev(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| {
        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(variance.sqrt())
    })
}

/// Exponential moving average with smoothing factor 2/(n+1), seeded with the
/// SMA of the first `period` values.
pub fn ema(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    seeded_smoothing(values, period, 2.0 / (period as f64 + 1.0))
}

/// Wilder's moving average (smoothing factor 1/n), seeded with the simple mean
/// of the first `period` values.
pub fn wilder(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    seeded_smoothing(values, period, 1.0 / period as f64)
}

fn seeded_smoothing(values: &[Option<f64>], period: usize, alpha: f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let mut prev: Option<f64> = None;
    let mut seed: Vec<f64> = Vec::with_capacity(period);

    for (i, value) in values.iter().enumerate() {
        let Some(x) = *value else {
            prev = None;
            seed.clear();
            continue;
        };

        match prev {
            Some(p) => {
                let next = (x - p) * alpha + p;
                out[i] = Some(next);
                prev = Some(next);
            }
            None => {
                seed.push(x);
                if seed.len() == period {
                    let mean = seed.iter().sum::<f64>() / period as f64;
                    out[i] = Some(mean);
                    prev = Some(mean);
                    seed.clear();
                }
            }
        }
    }

    out
}

/// Highest value of the trailing `period` window.
pub fn rolling_max(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    rolling(&wrapped, period, |w| {
        Some(w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    })
}

/// Lowest value of the trailing `period` window.
pub fn rolling_min(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    rolling(&wrapped, period, |w| {
        Some(w.iter().copied().fold(f64::INFINITY, f64::min))
    })
}

/// Fractional change from the previous value (0.25 = +25%).
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    for i in 1..values.len() {
        let prev = values[i - 1];
        out[i] = ratio(values[i] - prev, prev);
    }
    out
}

/// `numerator / denominator`, or `None` when the denominator is zero or the
/// result is not finite.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// Apply `f` to every complete trailing window of `period` defined values.
fn rolling<F>(values: &[Option<f64>], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let mut window: Vec<f64> = Vec::with_capacity(period);
    for i in (period.saturating_sub(1))..values.len() {
        window.clear();
        let start = i + 1 - period;
        for value in &values[start..=i] {
            match value {
                Some(v) => window.push(*v),
                None => break,
            }
        }
        if window.len() == period {
            out[i] = f(&window);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let v = actual.expect("value expected");
        assert!((v - expected).abs() < 1e-9, "expected {}, got {}", expected, v);
    }

    #[test]
    fn test_sma_basic() {
        let out = sma(&some(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_close(out[2], 2.0);
        assert_close(out[3], 3.0);
        assert_close(out[4], 4.0);
    }

    #[test]
    fn test_sma_skips_windows_with_gaps() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let out = sma(&values, 2);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);
        assert_close(out[3], 3.5);
        assert_close(out[4], 4.5);
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let out = ema(&some(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert_eq!(out[1], None);
        assert_close(out[2], 2.0);
        assert_close(out[3], 3.0);
        assert_close(out[4], 4.0);
    }

    #[test]
    fn test_ema_starts_after_leading_gap() {
        let values = vec![None, None, Some(2.0), Some(4.0), Some(6.0)];
        let out = ema(&values, 2);
        assert_eq!(out[2], None);
        assert_close(out[3], 3.0);
        // k = 2/3
        assert_close(out[4], 3.0 + (6.0 - 3.0) * 2.0 / 3.0);
    }

    #[test]
    fn test_wilder_smoothing() {
        let out = wilder(&some(&[2.0, 4.0, 9.0]), 2);
        assert_close(out[1], 3.0);
        assert_close(out[2], (3.0 * 1.0 + 9.0) / 2.0);
    }

    #[test]
    fn test_stddev_population() {
        let out = stddev(&some(&[1.0, 2.0, 3.0]), 3);
        assert_close(out[2], (2.0f64 / 3.0).sqrt());
    }

    #[test]
    fn test_rolling_extremes() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        let max = rolling_max(&values, 3);
        let min = rolling_min(&values, 3);
        assert_eq!(max[1], None);
        assert_eq!(max[2], Some(4.0));
        assert_eq!(max[4], Some(5.0));
        assert_eq!(min[2], Some(1.0));
        assert_eq!(min[4], Some(1.0));
    }

    #[test]
    fn test_pct_change_zero_previous_is_none() {
        let out = pct_change(&[0.0, 10.0, 15.0]);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_close(out[2], 0.5);
    }

    #[test]
    fn test_ratio_guards() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(0.0, 0.0), None);
        assert_eq!(ratio(1.0, 4.0), Some(0.25));
    }

    #[test]
    fn test_zero_period_yields_no_values() {
        let values = some(&[1.0, 2.0]);
        assert!(sma(&values, 0).iter().all(Option::is_none));
        assert!(ema(&values, 0).iter().all(Option::is_none));
        assert!(wilder(&values, 0).iter().all(Option::is_none));
    }
}
