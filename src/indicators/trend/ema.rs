//! EMA (Exponential Moving Average) indicator

use crate::common::math;

/// EMA series of closes for a span, seeded with the first close
pub fn calculate_ema(closes: &[f64], span: usize) -> Vec<f64> {
    math::ema(closes, span)
}

/// Several EMA series at once, in the order of `spans`
pub fn calculate_emas(closes: &[f64], spans: &[usize]) -> Vec<Vec<f64>> {
    spans.iter().map(|&span| calculate_ema(closes, span)).collect()
}
