//! Unit tests for price history ordering

use chrono::{NaiveDate, NaiveDateTime};
use stockscope::models::{OhlcvRow, PriceHistory};

fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

fn bar(day: u32, close: f64) -> OhlcvRow {
    OhlcvRow::new(close, close, close, close, 100, at(day))
}

#[test]
fn test_rows_are_sorted_ascending() {
    let history = PriceHistory::from_rows(vec![bar(5, 3.0), bar(1, 1.0), bar(3, 2.0)]);
    assert_eq!(history.closes(), vec![1.0, 2.0, 3.0]);
    assert_eq!(history.first_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(history.last_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
}

#[test]
fn test_duplicate_timestamps_keep_last_arrival() {
    let history = PriceHistory::from_rows(vec![bar(1, 1.0), bar(2, 2.0), bar(2, 2.5)]);
    assert_eq!(history.len(), 2);
    assert_eq!(history.closes(), vec![1.0, 2.5]);
}

#[test]
fn test_empty_history() {
    let history = PriceHistory::from_rows(Vec::new());
    assert!(history.is_empty());
    assert!(history.first_date().is_none());
    assert!(history.last_date().is_none());
}

#[test]
fn test_row_date_drops_time_of_day() {
    assert_eq!(bar(7, 1.0).date(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
}
