//! Prometheus metrics for the dashboard server

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub fetch_cache_hits_total: IntCounter,
    pub fetch_cache_misses_total: IntCounter,
    pub exports_total: IntCounterVec,
    pub chart_render_failures_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        )?;
        let fetch_cache_hits_total = IntCounter::new(
            "fetch_cache_hits_total",
            "History requests answered from the fetch cache",
        )?;
        let fetch_cache_misses_total = IntCounter::new(
            "fetch_cache_misses_total",
            "History requests that went to the market data provider",
        )?;
        let exports_total = IntCounterVec::new(
            Opts::new("exports_total", "Export buffers produced, by format"),
            &["format"],
        )?;
        let chart_render_failures_total = IntCounter::new(
            "chart_render_failures_total",
            "Chart rasterizations that fell back to the text note",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(fetch_cache_hits_total.clone()))?;
        registry.register(Box::new(fetch_cache_misses_total.clone()))?;
        registry.register(Box::new(exports_total.clone()))?;
        registry.register(Box::new(chart_render_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            fetch_cache_hits_total,
            fetch_cache_misses_total,
            exports_total,
            chart_render_failures_total,
        })
    }

    /// Render every registered metric in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
