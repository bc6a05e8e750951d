//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::trend::calculate_ema;

/// Index-aligned MACD series, defined at every index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Calculate MACD
///
/// MACD = EMA(short) - EMA(long)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// All EMAs are seeded with the first value of their input.
pub fn calculate_macd(
    closes: &[f64],
    short_span: usize,
    long_span: usize,
    signal_span: usize,
) -> MacdSeries {
    let fast = calculate_ema(closes, short_span);
    let slow = calculate_ema(closes, long_span);

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&macd, signal_span);
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}

/// Calculate MACD with default spans (12, 26, 9)
pub fn calculate_macd_default(closes: &[f64]) -> MacdSeries {
    calculate_macd(closes, 12, 26, 9)
}
