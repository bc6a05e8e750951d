//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use super::pipeline::{Dashboard, DashboardView, SessionContext};
use crate::charts::{ChartOptions, Metric, PlottersRasterizer, ViewMode};
use crate::config::{self, DashboardConfig};
use crate::error::DashboardError;
use crate::export::ExportFormat;
use crate::metrics::Metrics;
use crate::models::Period;
use crate::services::{CsvSnapshotProvider, MarketDataProvider, YahooMarketDataProvider};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub dashboard: Arc<Dashboard>,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(dashboard: Dashboard, metrics: Arc<Metrics>, config: DashboardConfig) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            dashboard: Arc::new(dashboard),
            config: Arc::new(config),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Request failure rendered as `{"error": kind, "message": text}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Dashboard(DashboardError),
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        ApiError::Dashboard(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "invalid_parameter", message),
            ApiError::Dashboard(e) => {
                let status = match &e {
                    DashboardError::EmptyDataset { .. } => StatusCode::NOT_FOUND,
                    DashboardError::InvalidRange { .. } | DashboardError::Indicator(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    DashboardError::DataSource(_) => StatusCode::BAD_GATEWAY,
                    DashboardError::ImageRenderFailure(_) | DashboardError::ExportFailure(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.kind(), e.user_message())
            }
        };
        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "stockscope-dashboard"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Session selections as query parameters; anything omitted takes the
/// configured default
#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub ticker: Option<String>,
    pub period: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// `single` (default) or `multi`
    pub view: Option<String>,
    /// Metric of the single view
    pub metric: Option<String>,
    /// Comma-separated metrics of the multi view
    pub metrics: Option<String>,
    pub bollinger: Option<bool>,
    pub macd: Option<bool>,
}

impl SessionQuery {
    pub fn into_session(self, config: &DashboardConfig) -> Result<SessionContext, ApiError> {
        let ticker = self
            .ticker
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| config.default_ticker.clone());
        let period = match self.period.as_deref() {
            Some(p) => p.parse::<Period>().map_err(ApiError::BadRequest)?,
            None => config.default_period,
        };

        let view = match self.view.as_deref().map(str::trim) {
            None | Some("") | Some("single") => {
                let metric = match self.metric.as_deref() {
                    Some(m) => m.parse::<Metric>().map_err(ApiError::BadRequest)?,
                    None => Metric::Close,
                };
                ViewMode::Single(metric)
            }
            Some("multi") => match self.metrics.as_deref() {
                Some(list) => ViewMode::Multi(parse_metric_list(list)?),
                None => ViewMode::default_multi(),
            },
            Some(other) => {
                return Err(ApiError::BadRequest(format!("unknown view '{}'", other)));
            }
        };

        let defaults = ChartOptions::default();
        let options = ChartOptions {
            view,
            show_bollinger: self.bollinger.unwrap_or(defaults.show_bollinger),
            show_macd: self.macd.unwrap_or(defaults.show_macd),
        };

        Ok(SessionContext::new(&ticker, period)
            .with_range(self.start, self.end)
            .with_options(options))
    }
}

fn parse_metric_list(list: &str) -> Result<Vec<Metric>, ApiError> {
    let mut metrics = Vec::new();
    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
        let metric = part.parse::<Metric>().map_err(ApiError::BadRequest)?;
        if !metrics.contains(&metric) {
            metrics.push(metric);
        }
    }
    Ok(metrics)
}

async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let session = query.into_session(&state.config)?;
    let view = state.dashboard.run(&session).await.map_err(|e| {
        warn!(error = %e, ticker = %session.ticker, "Dashboard run failed");
        e
    })?;
    Ok(Json(view))
}

/// Drop the cached history for (ticker, period) and fetch it again
async fn refresh_history(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>, ApiError> {
    let session = query.into_session(&state.config)?;
    let history = state.dashboard.refresh(&session).await?;
    Ok(Json(json!({
        "ticker": session.ticker,
        "period": session.period,
        "rows": history.len(),
        "first_date": history.first_date(),
        "last_date": history.last_date(),
    })))
}

async fn export_table(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, ApiError> {
    let format = format.parse::<ExportFormat>().map_err(ApiError::BadRequest)?;
    let session = query.into_session(&state.config)?;
    let artifact = state.dashboard.export(&session, format).await?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/refresh", post(refresh_history))
        .route("/api/export/{format}", get(export_table))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_env();
    let metrics = Arc::new(Metrics::new()?);

    let provider: Arc<dyn MarketDataProvider> = match config::get_snapshot_dir() {
        Some(dir) => {
            info!(dir = %dir, "Serving history from CSV snapshots");
            Arc::new(CsvSnapshotProvider::new(dir))
        }
        None => Arc::new(YahooMarketDataProvider::new()),
    };
    let dashboard = Dashboard::new(provider)
        .with_rasterizer(Arc::new(PlottersRasterizer::from_config(&config)))
        .with_metrics(metrics.clone());

    let state = AppState::new(dashboard, metrics, config);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
