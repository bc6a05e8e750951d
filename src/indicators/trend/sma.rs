//! SMA (Simple Moving Average) context lines

use crate::common::math;

pub const MA50_WINDOW: usize = 50;
pub const MA200_WINDOW: usize = 200;

/// Trailing simple moving average; `None` before the window fills
pub fn calculate_sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    math::rolling_mean(closes, window)
}
