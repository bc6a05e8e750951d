//! DataSource layer: providers of daily OHLCV history and the fetch cache

pub mod cache;
pub mod market_data;
pub mod snapshot;
pub mod summary;
pub mod yahoo;

pub use cache::{FetchCache, FetchKey};
pub use market_data::{normalize_ticker, InMemoryMarketDataProvider, MarketDataProvider};
pub use snapshot::CsvSnapshotProvider;
pub use yahoo::YahooMarketDataProvider;
