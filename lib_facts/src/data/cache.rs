//! # Cache Data Source
//!
//! Serves and persists facts through a [`FactStore`]. Store failures become
//! `Storage` error records here, at the store boundary.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::source::DataSource;
use crate::connections::{FactStore, StoreError};
use crate::loggers::{LayerLogger, LoggerLocal, ProjectLayer};
use crate::model::Fact;
use crate::retrieve::ErrorRecord;

/// The local, durable data source.
pub struct CacheDataSource {
    store: Arc<dyn FactStore>,
    logger: Arc<LoggerLocal>,
}

impl CacheDataSource {
    pub fn new(store: Arc<dyn FactStore>, logger: Arc<LoggerLocal>) -> Self {
        Self { store, logger }
    }

    async fn store_failure(log: &LayerLogger, action: &str, error: StoreError) -> ErrorRecord {
        let record = ErrorRecord::storage(format!("Failed to {} cached facts: {}", action, error));
        log.error(&record.message, Some(record.as_log_extras())).await;
        record
    }
}

#[async_trait]
impl DataSource for CacheDataSource {
    /// Returns at most `count` stored facts; fewer when fewer are stored.
    async fn load(&self, count: u32) -> Result<Vec<Fact>, ErrorRecord> {
        let log = self.logger.for_layer(ProjectLayer::DataSource);
        match self.store.read(count as usize).await {
            Ok(facts) => {
                log.debug("Loaded facts from the cache", Some(json!({ "requested": count, "found": facts.len() })))
                    .await;
                Ok(facts)
            }
            Err(e) => Err(Self::store_failure(&log, "read", e).await),
        }
    }

    async fn save(&self, facts: Vec<Fact>) -> Result<Vec<Fact>, ErrorRecord> {
        let log = self.logger.for_layer(ProjectLayer::DataSource);
        match self.store.write(&facts).await {
            Ok(()) => {
                log.debug("Saved facts to the cache", Some(json!({ "saved": facts.len() }))).await;
                Ok(facts)
            }
            Err(e) => Err(Self::store_failure(&log, "write", e).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::MemoryFactStore;
    use crate::retrieve::ErrorKind;
    use crate::test_support::{facts, texts};

    struct BrokenStore;

    #[async_trait]
    impl FactStore for BrokenStore {
        async fn read(&self, _limit: usize) -> Result<Vec<Fact>, StoreError> {
            Err(StoreError::Backend("read refused".into()))
        }

        async fn write(&self, _facts: &[Fact]) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk full".into()))
        }
    }

    fn cache(store: Arc<dyn FactStore>) -> CacheDataSource {
        CacheDataSource::new(store, Arc::new(LoggerLocal::silent("cache_test")))
    }

    #[tokio::test]
    async fn save_then_load_returns_saved_facts() {
        let cache = cache(Arc::new(MemoryFactStore::new()));

        let confirmed = cache.save(facts(&["A", "B"])).await.unwrap();
        assert_eq!(texts(&confirmed), vec!["A", "B"]);

        assert_eq!(texts(&cache.load(5).await.unwrap()), vec!["A", "B"]);
        assert_eq!(texts(&cache.load(1).await.unwrap()), vec!["A"]);
    }

    #[tokio::test]
    async fn empty_cache_loads_nothing() {
        let cache = cache(Arc::new(MemoryFactStore::new()));
        assert!(cache.load(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failures_become_storage_records() {
        let cache = cache(Arc::new(BrokenStore));

        let read = cache.load(1).await.unwrap_err();
        assert!(read.is(ErrorKind::Storage));
        assert!(read.message.contains("read refused"));

        let write = cache.save(facts(&["A"])).await.unwrap_err();
        assert!(write.is(ErrorKind::Storage));
        assert!(write.message.contains("disk full"));
    }
}
