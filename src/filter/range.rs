use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::models::OhlcvRow;

/// Inclusive `[start, end]` interval of calendar dates. Always `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub struct RangeFilter;

impl RangeFilter {
    /// Contiguous run of `rows` whose date falls inside `range`.
    ///
    /// `rows` must be ascending by timestamp. Only the date component of each
    /// timestamp is compared, so intraday times never push a bar out of range.
    pub fn apply<'a>(rows: &'a [OhlcvRow], range: &DateRange) -> &'a [OhlcvRow] {
        let from = rows.partition_point(|row| row.date() < range.start());
        let to = rows.partition_point(|row| row.date() <= range.end());
        if from >= to {
            return &[];
        }
        &rows[from..to]
    }
}
