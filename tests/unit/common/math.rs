//! Unit tests for rolling statistics and EMA helpers

use stockscope::common::math::{ema, ema_alpha, mean, rolling_mean, rolling_sample_std, sample_std};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_mean_of_empty_slice_is_none() {
    assert!(mean(&[]).is_none());
    assert_eq!(mean(&[4.0]), Some(4.0));
}

#[test]
fn test_sample_std_uses_n_minus_one() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert_close(sample_std(&values).unwrap(), (32.0f64 / 7.0).sqrt());
}

#[test]
fn test_sample_std_needs_two_values() {
    assert!(sample_std(&[1.0]).is_none());
    assert!(sample_std(&[]).is_none());
}

#[test]
fn test_rolling_mean_first_defined_at_window_minus_one() {
    let closes: Vec<f64> = (10..=30).map(f64::from).collect();
    let ma = rolling_mean(&closes, 20);

    assert_eq!(ma.len(), closes.len());
    assert!(ma[..19].iter().all(Option::is_none));
    assert_close(ma[19].unwrap(), 19.5);
    assert_close(ma[20].unwrap(), 20.5);
}

#[test]
fn test_rolling_window_longer_than_input() {
    let ma = rolling_mean(&[1.0, 2.0, 3.0], 5);
    assert_eq!(ma, vec![None, None, None]);
}

#[test]
fn test_rolling_zero_window_is_undefined() {
    assert_eq!(rolling_mean(&[1.0, 2.0], 0), vec![None, None]);
    assert_eq!(rolling_sample_std(&[1.0, 2.0], 0), vec![None, None]);
}

#[test]
fn test_rolling_std_of_constant_series_is_zero() {
    let std = rolling_sample_std(&[5.0; 4], 3);
    assert_eq!(std[1], None);
    assert_eq!(std[2], Some(0.0));
    assert_eq!(std[3], Some(0.0));
}

#[test]
fn test_ema_seeds_with_first_value() {
    assert_close(ema_alpha(3), 0.5);
    let out = ema(&[1.0, 2.0, 3.0], 3);
    assert_eq!(out.len(), 3);
    assert_close(out[0], 1.0);
    assert_close(out[1], 1.5);
    assert_close(out[2], 2.25);
}

#[test]
fn test_ema_of_empty_input() {
    assert!(ema(&[], 12).is_empty());
}
