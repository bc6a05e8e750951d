//! One synchronous pipeline run per user interaction:
//! fetch (memoized) -> range filter -> indicators -> charts / exports.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::charts::{
    build_charts, Chart, ChartBuilder, ChartImage, ChartOptions, ChartRasterizer, FigureBuilder,
    NoopRasterizer,
};
use crate::error::DashboardError;
use crate::export::{ExportArtifact, ExportFormat, ExportPipeline};
use crate::filter::{DateRange, RangeFilter};
use crate::indicators::IndicatorEngine;
use crate::metrics::Metrics;
use crate::models::{DerivedTable, Period, PriceHistory};
use crate::services::{normalize_ticker, FetchCache, FetchKey, MarketDataProvider};

pub const EMPTY_RANGE_NOTICE: &str = "No data in selected date range.";

/// Per-session selections, passed into every pipeline invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub ticker: String,
    pub period: Period,
    /// Defaults to the first fetched date
    pub start: Option<NaiveDate>,
    /// Defaults to the last fetched date
    pub end: Option<NaiveDate>,
    pub options: ChartOptions,
}

impl SessionContext {
    pub fn new(ticker: &str, period: Period) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            period,
            start: None,
            end: None,
            options: ChartOptions::default(),
        }
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fetch_key(&self) -> FetchKey {
        FetchKey::new(normalize_ticker(&self.ticker), self.period)
    }
}

/// Everything the dashboard shows for one run
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub ticker: String,
    pub period: Period,
    pub available_start: NaiveDate,
    pub available_end: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub table: DerivedTable,
    pub charts: Vec<Chart>,
    /// Set when the selected range holds no rows
    pub notice: Option<String>,
}

impl DashboardView {
    /// The chart a PDF report embeds
    pub fn main_chart(&self) -> Option<&Chart> {
        self.charts.first()
    }
}

/// Filter, compute and chart an already fetched history.
///
/// The range is validated before any indicator work happens.
pub fn derive_view(
    history: &PriceHistory,
    session: &SessionContext,
    engine: &IndicatorEngine,
    builder: &dyn ChartBuilder,
) -> Result<DashboardView, DashboardError> {
    let ticker = normalize_ticker(&session.ticker);
    let (Some(available_start), Some(available_end)) = (history.first_date(), history.last_date())
    else {
        return Err(DashboardError::EmptyDataset {
            ticker,
            period: session.period,
        });
    };

    let range = DateRange::new(
        session.start.unwrap_or(available_start),
        session.end.unwrap_or(available_end),
    )?;
    let rows = RangeFilter::apply(history.rows(), &range);
    let table = engine.compute(rows);
    let charts = build_charts(builder, &ticker, &table, &session.options);
    let notice = table.is_empty().then(|| EMPTY_RANGE_NOTICE.to_string());

    Ok(DashboardView {
        ticker,
        period: session.period,
        available_start,
        available_end,
        start: range.start(),
        end: range.end(),
        table,
        charts,
        notice,
    })
}

pub struct Dashboard {
    provider: Arc<dyn MarketDataProvider>,
    cache: Arc<FetchCache>,
    engine: IndicatorEngine,
    chart_builder: Arc<dyn ChartBuilder>,
    rasterizer: Arc<dyn ChartRasterizer>,
    metrics: Option<Arc<Metrics>>,
}

impl Dashboard {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            cache: Arc::new(FetchCache::new()),
            engine: IndicatorEngine::default(),
            chart_builder: Arc::new(FigureBuilder),
            rasterizer: Arc::new(NoopRasterizer),
            metrics: None,
        }
    }

    /// Share a cache with other dashboards (one per server, many sessions)
    pub fn with_cache(mut self, cache: Arc<FetchCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_engine(mut self, engine: IndicatorEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_chart_builder(mut self, chart_builder: Arc<dyn ChartBuilder>) -> Self {
        self.chart_builder = chart_builder;
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn ChartRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn cache(&self) -> &Arc<FetchCache> {
        &self.cache
    }

    /// History for the session's (ticker, period), served from the cache when present
    pub async fn history(&self, session: &SessionContext) -> Result<Arc<PriceHistory>, DashboardError> {
        let key = session.fetch_key();
        if let Some(history) = self.cache.get(&key).await {
            debug!(ticker = %key.ticker, period = %key.period, "Fetch cache hit");
            if let Some(metrics) = &self.metrics {
                metrics.fetch_cache_hits_total.inc();
            }
            return Ok(history);
        }
        if let Some(metrics) = &self.metrics {
            metrics.fetch_cache_misses_total.inc();
        }
        self.fetch(key).await
    }

    /// Drop the cached entry for the session's key and fetch it again
    pub async fn refresh(&self, session: &SessionContext) -> Result<Arc<PriceHistory>, DashboardError> {
        let key = session.fetch_key();
        let dropped = self.cache.invalidate(&key).await;
        info!(ticker = %key.ticker, period = %key.period, dropped, "Refreshing history");
        self.fetch(key).await
    }

    async fn fetch(&self, key: FetchKey) -> Result<Arc<PriceHistory>, DashboardError> {
        let rows = self.provider.fetch_history(&key.ticker, key.period).await?;
        let history = PriceHistory::from_rows(rows);
        if history.is_empty() {
            return Err(DashboardError::EmptyDataset {
                ticker: key.ticker,
                period: key.period,
            });
        }
        info!(ticker = %key.ticker, period = %key.period, rows = history.len(), "History fetched");
        Ok(self.cache.insert(key, history).await)
    }

    pub async fn run(&self, session: &SessionContext) -> Result<DashboardView, DashboardError> {
        let history = self.history(session).await?;
        derive_view(&history, session, &self.engine, self.chart_builder.as_ref())
    }

    pub async fn export(
        &self,
        session: &SessionContext,
        format: ExportFormat,
    ) -> Result<ExportArtifact, DashboardError> {
        let view = self.run(session).await?;
        let artifact = match format {
            ExportFormat::Csv => ExportPipeline::csv(&view.ticker, &view.table),
            ExportFormat::Xlsx => ExportPipeline::xlsx(&view.ticker, &view.table),
            ExportFormat::Pdf => {
                let image = self.chart_image(&view).await;
                ExportPipeline::pdf(&view.ticker, &view.table, &image, Local::now().naive_local())
            }
        };

        match &artifact {
            Ok(_) => {
                if let Some(metrics) = &self.metrics {
                    metrics.exports_total.with_label_values(&[format.as_str()]).inc();
                }
            }
            Err(e) => error!(error = %e, format = %format, ticker = %view.ticker, "Export failed"),
        }
        artifact
    }

    /// Rasterize the main chart on the blocking pool
    pub async fn chart_image(&self, view: &DashboardView) -> ChartImage {
        let image = match view.main_chart() {
            Some(chart) => {
                let rasterizer = Arc::clone(&self.rasterizer);
                let chart = chart.clone();
                tokio::task::spawn_blocking(move || rasterizer.rasterize(&chart))
                    .await
                    .unwrap_or_else(|e| {
                        ChartImage::Unavailable(format!("chart render task failed: {}", e))
                    })
            }
            None => ChartImage::Unavailable("no chart for an empty range".to_string()),
        };
        if !image.is_rendered() {
            if let Some(metrics) = &self.metrics {
                metrics.chart_render_failures_total.inc();
            }
        }
        image
    }
}
