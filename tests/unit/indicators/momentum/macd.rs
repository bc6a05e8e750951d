//! Unit tests for MACD

use stockscope::common::math::ema;
use stockscope::indicators::momentum::{calculate_macd, calculate_macd_default};

#[test]
fn test_macd_is_defined_at_every_row() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
    let series = calculate_macd_default(&closes);
    assert_eq!(series.macd.len(), 40);
    assert_eq!(series.signal.len(), 40);
    assert_eq!(series.histogram.len(), 40);
}

#[test]
fn test_macd_starts_at_zero() {
    let series = calculate_macd_default(&[42.0, 43.0, 41.0]);
    assert_eq!(series.macd[0], 0.0);
    assert_eq!(series.signal[0], 0.0);
    assert_eq!(series.histogram[0], 0.0);
}

#[test]
fn test_histogram_is_macd_minus_signal() {
    let closes: Vec<f64> = (0..60).map(|i| 50.0 + i as f64 + (i % 7) as f64).collect();
    let series = calculate_macd(&closes, 12, 26, 9);
    for i in 0..closes.len() {
        assert!((series.histogram[i] - (series.macd[i] - series.signal[i])).abs() < 1e-12);
    }
}

#[test]
fn test_macd_matches_ema_difference() {
    let closes: Vec<f64> = (0..30).map(|i| 10.0 + (i * i) as f64 * 0.01).collect();
    let series = calculate_macd(&closes, 12, 26, 9);
    let fast = ema(&closes, 12);
    let slow = ema(&closes, 26);
    let signal = ema(&series.macd, 9);

    for i in 0..closes.len() {
        assert!((series.macd[i] - (fast[i] - slow[i])).abs() < 1e-12);
        assert!((series.signal[i] - signal[i]).abs() < 1e-12);
    }
}

#[test]
fn test_rising_prices_give_positive_macd() {
    let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
    let series = calculate_macd_default(&closes);
    assert!(series.macd[49] > 0.0);
}

#[test]
fn test_empty_input() {
    let series = calculate_macd_default(&[]);
    assert!(series.macd.is_empty());
    assert!(series.histogram.is_empty());
}

#[test]
fn test_macd_line_is_difference_of_ema_helper_series() {
    use stockscope::indicators::trend::calculate_ema;

    let closes: Vec<f64> = (0..80).map(|i| 200.0 + (i as f64 * 0.2).cos() * 5.0).collect();
    let series = calculate_macd(&closes, 12, 26, 9);
    let fast = calculate_ema(&closes, 12);
    let slow = calculate_ema(&closes, 26);
    let signal = calculate_ema(&series.macd, 9);
    for i in 0..closes.len() {
        assert!((series.macd[i] - (fast[i] - slow[i])).abs() < 1e-12);
        assert!((series.signal[i] - signal[i]).abs() < 1e-12);
    }
}
