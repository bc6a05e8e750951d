//! Memoized fetch results keyed by (ticker, period)

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Period, PriceHistory};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub ticker: String,
    pub period: Period,
}

impl FetchKey {
    pub fn new(ticker: impl Into<String>, period: Period) -> Self {
        Self {
            ticker: ticker.into(),
            period,
        }
    }
}

/// Shared across sessions. Entries are immutable once written: `insert`
/// swaps in a new `Arc`, readers keep whatever `Arc` they already hold.
#[derive(Default)]
pub struct FetchCache {
    entries: RwLock<HashMap<FetchKey, Arc<PriceHistory>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &FetchKey) -> Option<Arc<PriceHistory>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: FetchKey, history: PriceHistory) -> Arc<PriceHistory> {
        let history = Arc::new(history);
        self.entries.write().await.insert(key, history.clone());
        history
    }

    /// Drop the entry for `key`; returns whether one was present
    pub async fn invalidate(&self, key: &FetchKey) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
