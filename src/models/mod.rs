//! Shared data models spanning the pipeline stages.

pub mod ohlcv;
pub mod period;
pub mod table;

pub use ohlcv::{OhlcvRow, PriceHistory};
pub use period::Period;
pub use table::{Cell, Column, DerivedRow, DerivedTable};
