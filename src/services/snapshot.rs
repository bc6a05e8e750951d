//! Flat CSV snapshots of a ticker's history, written by `fetch-history`

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::models::{OhlcvRow, Period};
use crate::services::market_data::{normalize_ticker, MarketDataProvider};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: u64,
}

/// Serialize bars as `Date,Open,High,Low,Close,Volume`
pub fn snapshot_bytes(rows: &[OhlcvRow]) -> Result<Vec<u8>, DashboardError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(SnapshotRecord {
            date: row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| DashboardError::ExportFailure(format!("csv: {}", e)))
}

/// Write (overwriting) a snapshot file
pub fn write_snapshot(path: &Path, rows: &[OhlcvRow]) -> Result<(), DashboardError> {
    let bytes = snapshot_bytes(rows)?;
    std::fs::write(path, bytes).map_err(|e| {
        DashboardError::ExportFailure(format!("writing {}: {}", path.display(), e))
    })
}

/// Parse snapshot CSV content. Dates may carry a time of day or not.
pub fn read_snapshot(bytes: &[u8]) -> Result<Vec<OhlcvRow>, DashboardError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();
    for record in reader.deserialize::<SnapshotRecord>() {
        let record = record.map_err(|e| DashboardError::DataSource(format!("snapshot: {}", e)))?;
        let timestamp = parse_timestamp(&record.date).ok_or_else(|| {
            DashboardError::DataSource(format!("snapshot: bad date '{}'", record.date))
        })?;
        rows.push(OhlcvRow::new(
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
            timestamp,
        ));
    }
    Ok(rows)
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Serves `<dir>/<TICKER>.csv` snapshots, trimmed to the requested lookback.
pub struct CsvSnapshotProvider {
    dir: PathBuf,
}

impl CsvSnapshotProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", normalize_ticker(ticker)))
    }
}

#[async_trait]
impl MarketDataProvider for CsvSnapshotProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        period: Period,
    ) -> Result<Vec<OhlcvRow>, DashboardError> {
        let path = self.path_for(ticker);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DashboardError::DataSource(format!(
                    "reading {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let rows = read_snapshot(&bytes)?;
        Ok(trim_to_period(rows, period))
    }
}

/// Keep the bars within `period` of the latest bar
pub fn trim_to_period(rows: Vec<OhlcvRow>, period: Period) -> Vec<OhlcvRow> {
    let Some(latest) = rows.iter().map(OhlcvRow::date).max() else {
        return rows;
    };
    match latest.checked_sub_months(Months::new(12 * period.years())) {
        Some(cutoff) => rows.into_iter().filter(|r| r.date() > cutoff).collect(),
        None => rows,
    }
}
