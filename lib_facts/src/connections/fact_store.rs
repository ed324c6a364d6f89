//! # Fact Stores
//!
//! The durable storage contract behind the cache data source, plus the
//! in-process implementation.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::Fact;

/// Failures of a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Stored facts could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Durable storage for facts.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Reads at most `limit` facts, in the order they were written.
    async fn read(&self, limit: usize) -> Result<Vec<Fact>, StoreError>;

    /// Replaces the stored facts with `facts`.
    async fn write(&self, facts: &[Fact]) -> Result<(), StoreError>;
}

/// A store kept in process memory; contents are lost on exit.
#[derive(Default)]
pub struct MemoryFactStore {
    facts: RwLock<Vec<Fact>>,
}

impl MemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FactStore for MemoryFactStore {
    async fn read(&self, limit: usize) -> Result<Vec<Fact>, StoreError> {
        let facts = self.facts.read().await;
        Ok(facts.iter().take(limit).cloned().collect())
    }

    async fn write(&self, facts: &[Fact]) -> Result<(), StoreError> {
        let mut stored = self.facts.write().await;
        *stored = facts.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FactsTransferRecord;

    fn facts(texts: &[&str]) -> Vec<Fact> {
        texts
            .iter()
            .map(|t| Fact::from(FactsTransferRecord { fact: t.to_string() }))
            .collect()
    }

    #[tokio::test]
    async fn empty_store_reads_nothing() {
        let store = MemoryFactStore::new();
        assert!(store.read(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_is_limited_and_ordered() {
        let store = MemoryFactStore::new();
        store.write(&facts(&["A", "B", "C"])).await.unwrap();

        assert_eq!(store.read(2).await.unwrap(), facts(&["A", "B"]));
        assert_eq!(store.read(10).await.unwrap(), facts(&["A", "B", "C"]));
        assert!(store.read(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_replaces_previous_contents() {
        let store = MemoryFactStore::new();
        store.write(&facts(&["A", "B"])).await.unwrap();
        store.write(&facts(&["C"])).await.unwrap();

        assert_eq!(store.read(10).await.unwrap(), facts(&["C"]));
    }
}
