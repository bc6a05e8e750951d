//! ExportPipeline: derived table (and chart image) to downloadable buffers

pub mod csv;
pub mod pdf;
pub mod xlsx;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::charts::ChartImage;
use crate::error::DashboardError;
use crate::models::DerivedTable;

pub use self::csv::{read_csv, write_csv};
pub use self::pdf::{render_pdf, truncate_cell, ReportImage, ReportLayout};
pub use self::xlsx::{write_xlsx, SHEET_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn file_name(&self, ticker: &str) -> String {
        match self {
            ExportFormat::Csv => format!("{}_filtered.csv", ticker),
            ExportFormat::Xlsx => format!("{}_filtered.xlsx", ticker),
            ExportFormat::Pdf => format!("{}_report.pdf", ticker),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// A finished download
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

pub struct ExportPipeline;

impl ExportPipeline {
    pub fn csv(ticker: &str, table: &DerivedTable) -> Result<ExportArtifact, DashboardError> {
        Self::finish(ExportFormat::Csv, ticker, write_csv(table)?)
    }

    pub fn xlsx(ticker: &str, table: &DerivedTable) -> Result<ExportArtifact, DashboardError> {
        Self::finish(ExportFormat::Xlsx, ticker, write_xlsx(table)?)
    }

    /// PDF report. An unavailable image degrades to a text note, never an error.
    pub fn pdf(
        ticker: &str,
        table: &DerivedTable,
        image: &ChartImage,
        generated_at: NaiveDateTime,
    ) -> Result<ExportArtifact, DashboardError> {
        let layout = ReportLayout::build(ticker, table, image, generated_at);
        Self::finish(ExportFormat::Pdf, ticker, render_pdf(&layout)?)
    }

    fn finish(
        format: ExportFormat,
        ticker: &str,
        bytes: Vec<u8>,
    ) -> Result<ExportArtifact, DashboardError> {
        let file_name = format.file_name(ticker);
        info!(format = %format, file = %file_name, size = bytes.len(), "Export prepared");
        Ok(ExportArtifact {
            format,
            file_name,
            bytes,
        })
    }
}
