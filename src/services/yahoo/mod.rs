//! Yahoo Finance chart API integration

pub mod messages;
pub mod provider;

pub use messages::ChartEnvelope;
pub use provider::{rows_from_chart, YahooMarketDataProvider};
