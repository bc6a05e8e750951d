use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One daily bar. `timestamp` is exchange-local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRow {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcvRow {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Trading date of the bar
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Time-ordered bars for one ticker: ascending, no duplicate timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    rows: Vec<OhlcvRow>,
}

impl PriceHistory {
    /// Sort provider output and drop repeated timestamps, keeping the bar
    /// that arrived last (providers re-send the in-progress session).
    pub fn from_rows(mut rows: Vec<OhlcvRow>) -> Self {
        rows.reverse();
        // stable sort keeps the latest-arrived bar first within equal timestamps
        rows.sort_by_key(|row| row.timestamp);
        rows.dedup_by_key(|row| row.timestamp);
        Self { rows }
    }

    pub fn rows(&self) -> &[OhlcvRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(OhlcvRow::date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(OhlcvRow::date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.close).collect()
    }
}
