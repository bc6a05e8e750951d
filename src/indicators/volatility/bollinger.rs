//! Bollinger Bands indicator

use crate::common::math;

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Index-aligned band series; `None` until the window fills.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands over a close series
///
/// Middle Band = SMA(window)
/// Upper Band = Middle + k * sample standard deviation
/// Lower Band = Middle - k * sample standard deviation
pub fn calculate_bollinger_bands(closes: &[f64], window: usize, k: f64) -> BollingerBands {
    let middle = math::rolling_mean(closes, window);
    let std = math::rolling_sample_std(closes, window);

    let (upper, lower) = middle
        .iter()
        .zip(&std)
        .map(|(ma, sd)| match (ma, sd) {
            (Some(ma), Some(sd)) => (Some(ma + k * sd), Some(ma - k * sd)),
            _ => (None, None),
        })
        .unzip();

    BollingerBands {
        middle,
        upper,
        lower,
    }
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(closes: &[f64]) -> BollingerBands {
    calculate_bollinger_bands(closes, DEFAULT_WINDOW, DEFAULT_MULTIPLIER)
}
