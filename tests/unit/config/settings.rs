//! Unit tests for configuration defaults and logging mode selection

use stockscope::config::{DashboardConfig, DEFAULT_FONT_PATH};
use stockscope::logging::is_production;
use stockscope::models::Period;

#[test]
fn test_dashboard_config_defaults() {
    let config = DashboardConfig::default();
    assert_eq!(config.default_ticker, "INFY.BO");
    assert_eq!(config.default_period, Period::FiveYears);
    assert_eq!((config.chart_width, config.chart_height), (1200, 520));
    assert_eq!(config.font_path, DEFAULT_FONT_PATH);
}

#[test]
fn test_production_environments_log_json() {
    assert!(is_production("production"));
    assert!(is_production("prod"));
    assert!(!is_production("sandbox"));
    assert!(!is_production("staging"));
}
