//! Test utilities for API server integration tests

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{Duration, NaiveDate};
use stockscope::charts::NoopRasterizer;
use stockscope::config::DashboardConfig;
use stockscope::core::http::{create_router, AppState};
use stockscope::core::pipeline::Dashboard;
use stockscope::metrics::Metrics;
use stockscope::models::OhlcvRow;
use stockscope::services::InMemoryMarketDataProvider;

/// Daily bars from 2024-01-01 with a steadily rising close
pub fn create_test_rows(count: i64) -> Vec<OhlcvRow> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|i| {
            let close = 1500.0 + i as f64;
            OhlcvRow::new(
                close - 2.0,
                close + 4.0,
                close - 4.0,
                close,
                10_000 + i as u64,
                (start + Duration::days(i)).and_hms_opt(0, 0, 0).unwrap(),
            )
        })
        .collect()
}

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub provider: Arc<InMemoryMarketDataProvider>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let provider = Arc::new(
            InMemoryMarketDataProvider::new()
                .with_rows("INFY.BO", create_test_rows(60))
                .with_rows("TCS.NS", create_test_rows(5)),
        );
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let dashboard = Dashboard::new(provider.clone())
            .with_rasterizer(Arc::new(NoopRasterizer))
            .with_metrics(metrics.clone());

        let state = AppState::new(dashboard, metrics.clone(), DashboardConfig::default());
        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            provider,
        }
    }
}
