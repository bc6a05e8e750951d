//! Rolling-window statistics and exponential smoothing over index-aligned series.
//!
//! Every function returns a vector the same length as its input. Entries whose
//! window has not filled yet are `None`.

/// Arithmetic mean of a slice. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (denominator `n - 1`). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Simple moving average over a trailing window of `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, mean)
}

/// Trailing-window sample standard deviation.
pub fn rolling_sample_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, sample_std)
}

fn rolling<F>(values: &[f64], window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                stat(&values[i + 1 - window..=i])
            }
        })
        .collect()
}

/// Smoothing factor for an EMA with the given span: `2 / (span + 1)`
pub fn ema_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// One step of the EMA recurrence
pub fn ema_step(value: f64, previous: f64, alpha: f64) -> f64 {
    alpha * value + (1.0 - alpha) * previous
}

/// Exponential moving average seeded with the first value (no bias correction).
///
/// `ema[0] = values[0]`, `ema[i] = a * values[i] + (1 - a) * ema[i - 1]`.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = ema_alpha(span);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    if let Some(&first) = iter.next() {
        let mut previous = first;
        out.push(previous);
        for &value in iter {
            previous = ema_step(value, previous, alpha);
            out.push(previous);
        }
    }
    out
}
