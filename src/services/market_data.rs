//! Market data provider interface

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::DashboardError;
use crate::models::{OhlcvRow, Period};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `ticker` covering `period`, in any order.
    ///
    /// An unknown ticker yields `Ok` with no rows; `Err` is reserved for
    /// transport and decoding failures.
    async fn fetch_history(
        &self,
        ticker: &str,
        period: Period,
    ) -> Result<Vec<OhlcvRow>, DashboardError>;
}

/// Canonical form of a user-typed ticker symbol
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Fixed rows per ticker. Ignores the period and counts every fetch.
#[derive(Default)]
pub struct InMemoryMarketDataProvider {
    rows: HashMap<String, Vec<OhlcvRow>>,
    fetches: AtomicUsize,
}

impl InMemoryMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, ticker: &str, rows: Vec<OhlcvRow>) -> Self {
        self.rows.insert(normalize_ticker(ticker), rows);
        self
    }

    /// Number of `fetch_history` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        _period: Period,
    ) -> Result<Vec<OhlcvRow>, DashboardError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .get(&normalize_ticker(ticker))
            .cloned()
            .unwrap_or_default())
    }
}
