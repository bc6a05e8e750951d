//! Environment-driven configuration

use std::env;

use crate::models::Period;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Deployment environment name (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_port() -> u16 {
    parse_var("PORT").unwrap_or(8080)
}

pub fn get_yahoo_base_url() -> String {
    env::var("YAHOO_BASE_URL").unwrap_or_else(|_| DEFAULT_YAHOO_BASE_URL.to_string())
}

/// Directory of `<TICKER>.csv` snapshots; serves history offline when set
pub fn get_snapshot_dir() -> Option<String> {
    env::var("SNAPSHOT_DIR").ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Settings shared by the dashboard server and the export pipeline
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub default_ticker: String,
    pub default_period: Period,
    pub chart_width: u32,
    pub chart_height: u32,
    pub font_path: String,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ticker: env::var("DEFAULT_TICKER").unwrap_or(defaults.default_ticker),
            default_period: parse_var("DEFAULT_PERIOD").unwrap_or(defaults.default_period),
            chart_width: parse_var("CHART_WIDTH").unwrap_or(defaults.chart_width),
            chart_height: parse_var("CHART_HEIGHT").unwrap_or(defaults.chart_height),
            font_path: env::var("CHART_FONT_PATH").unwrap_or(defaults.font_path),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_ticker: "INFY.BO".to_string(),
            default_period: Period::FiveYears,
            chart_width: 1200,
            chart_height: 520,
            font_path: DEFAULT_FONT_PATH.to_string(),
        }
    }
}
