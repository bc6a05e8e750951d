//! Unit tests for the indicator engine

use chrono::{Duration, NaiveDate};
use stockscope::indicators::{IndicatorEngine, IndicatorError, IndicatorParams};
use stockscope::models::OhlcvRow;

fn create_test_rows(closes: &[f64]) -> Vec<OhlcvRow> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let date = start + Duration::days(i as i64);
            OhlcvRow::new(
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                1_000 + i as u64,
                date.and_hms_opt(0, 0, 0).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_default_params() {
    let params = IndicatorParams::default();
    assert_eq!(params.bollinger_window, 20);
    assert_eq!(params.bollinger_k, 2.0);
    assert_eq!((params.macd_short, params.macd_long, params.macd_signal), (12, 26, 9));
    assert_eq!((params.ma_short_window, params.ma_long_window), (50, 200));
    assert!(params.validate().is_ok());
}

#[test]
fn test_zero_window_is_rejected() {
    let params = IndicatorParams {
        bollinger_window: 0,
        ..IndicatorParams::default()
    };
    assert!(matches!(
        IndicatorEngine::new(params),
        Err(IndicatorError::ZeroWindow { .. })
    ));
}

#[test]
fn test_zero_span_is_rejected() {
    let params = IndicatorParams {
        macd_signal: 0,
        ..IndicatorParams::default()
    };
    assert!(matches!(
        params.validate(),
        Err(IndicatorError::ZeroSpan { .. })
    ));
}

#[test]
fn test_negative_multiplier_is_rejected() {
    let params = IndicatorParams {
        bollinger_k: -1.0,
        ..IndicatorParams::default()
    };
    assert!(matches!(
        params.validate(),
        Err(IndicatorError::InvalidMultiplier(_))
    ));
}

#[test]
fn test_compute_keeps_one_row_per_bar() {
    let closes: Vec<f64> = (10..=30).map(f64::from).collect();
    let rows = create_test_rows(&closes);
    let table = IndicatorEngine::default().compute(&rows);

    assert_eq!(table.len(), rows.len());
    for (derived, bar) in table.rows.iter().zip(&rows) {
        assert_eq!(derived.date, bar.date());
        assert_eq!(derived.close, bar.close);
        assert_eq!(derived.volume, bar.volume);
    }
}

#[test]
fn test_compute_fills_indicator_columns() {
    let closes: Vec<f64> = (10..=30).map(f64::from).collect();
    let table = IndicatorEngine::default().compute(&create_test_rows(&closes));

    assert!(table.rows[18].bb_ma.is_none());
    assert_eq!(table.rows[19].bb_ma, Some(19.5));
    assert!(table.rows[19].bb_upper.unwrap() > 19.5);
    assert!(table.rows.iter().all(|r| r.ma50.is_none() && r.ma200.is_none()));
    assert_eq!(table.rows[0].macd, 0.0);
    assert!(table.rows[20].macd > 0.0);
}

#[test]
fn test_compute_on_empty_input() {
    assert!(IndicatorEngine::default().compute(&[]).is_empty());
}

#[test]
fn test_custom_params_shift_first_defined_band() {
    let params = IndicatorParams {
        bollinger_window: 5,
        ..IndicatorParams::default()
    };
    let engine = IndicatorEngine::new(params).unwrap();
    let table = engine.compute(&create_test_rows(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    assert!(table.rows[3].bb_ma.is_none());
    assert_eq!(table.rows[4].bb_ma, Some(3.0));
    assert_eq!(engine.params().bollinger_window, 5);
}
