//! IndicatorEngine: Bollinger Bands, MACD and context moving averages

pub mod engine;
pub mod error;

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use engine::{IndicatorEngine, IndicatorParams};
pub use error::IndicatorError;
