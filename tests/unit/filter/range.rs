//! Unit tests for date range filtering

use chrono::{Duration, NaiveDate};
use stockscope::filter::{DateRange, RangeFilter};
use stockscope::models::OhlcvRow;
use stockscope::DashboardError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Ten consecutive daily bars from 2024-01-01, stamped mid-session
fn create_test_rows() -> Vec<OhlcvRow> {
    (0..10)
        .map(|i| {
            let day = date(2024, 1, 1) + Duration::days(i);
            OhlcvRow::new(1.0, 1.0, 1.0, i as f64, 10, day.and_hms_opt(15, 30, 0).unwrap())
        })
        .collect()
}

#[test]
fn test_start_after_end_is_invalid() {
    let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, DashboardError::InvalidRange { .. }));
    assert_eq!(err.kind(), "invalid_range");
}

#[test]
fn test_single_day_range_is_valid() {
    let range = DateRange::new(date(2024, 1, 3), date(2024, 1, 3)).unwrap();
    assert!(range.contains(date(2024, 1, 3)));
    assert!(!range.contains(date(2024, 1, 4)));
}

#[test]
fn test_bounds_are_inclusive_despite_intraday_time() {
    let rows = create_test_rows();
    let range = DateRange::new(date(2024, 1, 3), date(2024, 1, 5)).unwrap();
    let filtered = RangeFilter::apply(&rows, &range);

    let closes: Vec<f64> = filtered.iter().map(|r| r.close).collect();
    assert_eq!(closes, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_range_covering_everything() {
    let rows = create_test_rows();
    let range = DateRange::new(date(2023, 1, 1), date(2025, 1, 1)).unwrap();
    assert_eq!(RangeFilter::apply(&rows, &range).len(), rows.len());
}

#[test]
fn test_range_outside_history_is_empty() {
    let rows = create_test_rows();
    let range = DateRange::new(date(2023, 6, 1), date(2023, 6, 30)).unwrap();
    assert!(RangeFilter::apply(&rows, &range).is_empty());
}
