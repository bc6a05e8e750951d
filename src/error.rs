//! Error taxonomy shared by the fetch, filter, indicator and export stages

use chrono::NaiveDate;
use thiserror::Error;

use crate::indicators::IndicatorError;
use crate::models::Period;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no data found for {ticker} over {period}")]
    EmptyDataset { ticker: String, period: Period },

    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("chart image could not be rendered: {0}")]
    ImageRenderFailure(String),

    #[error("export failed: {0}")]
    ExportFailure(String),

    #[error("market data request failed: {0}")]
    DataSource(String),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

impl DashboardError {
    /// Stable machine-readable tag
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::EmptyDataset { .. } => "empty_dataset",
            DashboardError::InvalidRange { .. } => "invalid_range",
            DashboardError::ImageRenderFailure(_) => "image_render_failure",
            DashboardError::ExportFailure(_) => "export_failure",
            DashboardError::DataSource(_) => "data_source",
            DashboardError::Indicator(_) => "invalid_parameter",
        }
    }

    /// Sentence shown inline to the user
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::EmptyDataset { ticker, period } => format!(
                "No data found for {} over {}. Check the symbol (e.g., INFY.BO) and try again.",
                ticker, period
            ),
            DashboardError::InvalidRange { .. } => {
                "Start Date must be before or equal to End Date.".to_string()
            }
            DashboardError::ImageRenderFailure(_) => "Chart image not available.".to_string(),
            DashboardError::ExportFailure(reason) => format!("Failed to create export: {}", reason),
            DashboardError::DataSource(reason) => {
                format!("Could not fetch market data: {}", reason)
            }
            DashboardError::Indicator(e) => format!("Invalid indicator settings: {}", e),
        }
    }
}

impl From<csv::Error> for DashboardError {
    fn from(e: csv::Error) -> Self {
        DashboardError::ExportFailure(format!("csv: {}", e))
    }
}

impl From<rust_xlsxwriter::XlsxError> for DashboardError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        DashboardError::ExportFailure(format!("xlsx: {}", e))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        DashboardError::DataSource(e.to_string())
    }
}
