//! Stock history dashboard back-end: fetches daily OHLCV bars, derives
//! Bollinger Bands and MACD, and exports the result as CSV, XLSX or PDF.

pub mod charts;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod filter;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

pub use error::DashboardError;
