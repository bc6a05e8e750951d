//! Unit tests for the fetch cache

use std::sync::Arc;

use chrono::NaiveDate;
use stockscope::models::{OhlcvRow, Period, PriceHistory};
use stockscope::services::{normalize_ticker, FetchCache, FetchKey};

fn create_test_history(close: f64) -> PriceHistory {
    let ts = NaiveDate::from_ymd_opt(2024, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    PriceHistory::from_rows(vec![OhlcvRow::new(close, close, close, close, 1, ts)])
}

#[tokio::test]
async fn test_insert_then_get() {
    let cache = FetchCache::new();
    let key = FetchKey::new("INFY.BO", Period::FiveYears);
    assert!(cache.get(&key).await.is_none());

    cache.insert(key.clone(), create_test_history(1.0)).await;
    let cached = cache.get(&key).await.unwrap();
    assert_eq!(cached.closes(), vec![1.0]);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_keys_differ_by_period() {
    let cache = FetchCache::new();
    cache
        .insert(FetchKey::new("INFY.BO", Period::OneYear), create_test_history(1.0))
        .await;
    assert!(cache
        .get(&FetchKey::new("INFY.BO", Period::FiveYears))
        .await
        .is_none());
}

#[tokio::test]
async fn test_invalidate_drops_entry() {
    let cache = FetchCache::new();
    let key = FetchKey::new("TCS.NS", Period::TwoYears);
    cache.insert(key.clone(), create_test_history(1.0)).await;

    assert!(cache.invalidate(&key).await);
    assert!(!cache.invalidate(&key).await);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_readers_keep_their_snapshot_after_replacement() {
    let cache = FetchCache::new();
    let key = FetchKey::new("TCS.NS", Period::TwoYears);
    let first = cache.insert(key.clone(), create_test_history(1.0)).await;
    cache.insert(key.clone(), create_test_history(2.0)).await;

    assert_eq!(first.closes(), vec![1.0]);
    let current = cache.get(&key).await.unwrap();
    assert_eq!(current.closes(), vec![2.0]);
    assert!(!Arc::ptr_eq(&first, &current));
}

#[test]
fn test_normalize_ticker() {
    assert_eq!(normalize_ticker("  infy.bo "), "INFY.BO");
}
