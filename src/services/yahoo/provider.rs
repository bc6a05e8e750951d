//! Yahoo Finance daily history provider

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::messages::{ChartEnvelope, Quote};
use crate::config;
use crate::error::DashboardError;
use crate::models::{OhlcvRow, Period};
use crate::services::market_data::{normalize_ticker, MarketDataProvider};

const NOT_FOUND_CODE: &str = "Not Found";

pub struct YahooMarketDataProvider {
    client: Client,
    base_url: String,
}

impl YahooMarketDataProvider {
    /// Provider pointed at `YAHOO_BASE_URL` (or the public endpoint)
    pub fn new() -> Self {
        Self::with_client(config::get_yahoo_base_url(), Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn chart_url(&self, ticker: &str, period: Period) -> Result<Url, DashboardError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DashboardError::DataSource(format!("invalid chart API url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DashboardError::DataSource("chart API url cannot carry a path".into()))?
            .pop_if_empty()
            .push(ticker);
        url.query_pairs_mut()
            .append_pair("range", period.as_str())
            .append_pair("interval", "1d");
        Ok(url)
    }
}

impl Default for YahooMarketDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        period: Period,
    ) -> Result<Vec<OhlcvRow>, DashboardError> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.chart_url(&ticker, period)?;
        debug!(ticker = %ticker, period = %period, url = %url, "Requesting chart history");

        let response = self
            .client
            .get(url)
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ChartEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(DashboardError::DataSource(format!(
                    "chart API returned HTTP {}",
                    status
                )))
            }
            Err(e) => {
                return Err(DashboardError::DataSource(format!(
                    "invalid chart response: {}",
                    e
                )))
            }
        };

        let rows = rows_from_chart(envelope)?;
        if rows.is_empty() && !status.is_success() && status.as_u16() != 404 {
            return Err(DashboardError::DataSource(format!(
                "chart API returned HTTP {}",
                status
            )));
        }
        debug!(ticker = %ticker, rows = rows.len(), "Chart history decoded");
        Ok(rows)
    }
}

/// Convert a decoded chart response into bars.
///
/// Timestamps are shifted by the exchange offset so each bar carries its local
/// trading date. Bars with a missing or negative field are skipped.
pub fn rows_from_chart(envelope: ChartEnvelope) -> Result<Vec<OhlcvRow>, DashboardError> {
    if let Some(error) = envelope.chart.error {
        if error.code == NOT_FOUND_CODE {
            return Ok(Vec::new());
        }
        return Err(DashboardError::DataSource(format!(
            "{}: {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let mut rows = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;
    for (i, ts) in timestamps.iter().enumerate() {
        match bar_at(&quote, i, ts + offset) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(
            symbol = result.meta.symbol.as_deref().unwrap_or("?"),
            skipped, "Skipped incomplete chart bars"
        );
    }
    Ok(rows)
}

fn bar_at(quote: &Quote, i: usize, local_ts: i64) -> Option<OhlcvRow> {
    let field = |series: &[Option<f64>]| {
        series
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite() && *v >= 0.0)
    };
    let timestamp = DateTime::from_timestamp(local_ts, 0)?.naive_utc();
    Some(OhlcvRow::new(
        field(&quote.open)?,
        field(&quote.high)?,
        field(&quote.low)?,
        field(&quote.close)?,
        field(&quote.volume)?.round() as u64,
        timestamp,
    ))
}
