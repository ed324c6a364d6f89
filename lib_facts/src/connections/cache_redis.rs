//! # Redis Fact Store
//!
//! Keeps the cached facts as one JSON array under a single Redis key.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError};

use super::fact_store::{FactStore, StoreError};
use crate::model::{Fact, FactsTransferRecord, FactsTransferRecords};

impl From<RedisError> for StoreError {
    fn from(e: RedisError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Encodes facts in the same record shape the API sends.
fn encode_facts(facts: &[Fact]) -> Result<String, StoreError> {
    let records: FactsTransferRecords = facts.iter().map(FactsTransferRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Decodes stored records and maps them into facts, keeping at most `limit`.
fn decode_facts(json: &str, limit: usize) -> Result<Vec<Fact>, StoreError> {
    let records: FactsTransferRecords = serde_json::from_str(json)?;
    Ok(records.into_iter().take(limit).map(Fact::from).collect())
}

/// A fact store backed by Redis.
pub struct RedisFactStore {
    /// The internal Redis client instance.
    client: Client,
    /// Key holding the JSON array.
    key: String,
}

impl RedisFactStore {
    /// Creates a store from a connection string.
    ///
    /// No connection is opened until the first read or write.
    ///
    /// # Arguments
    /// * `url` - The redis URL (e.g., "redis://127.0.0.1/").
    /// * `key` - The key the facts are stored under.
    pub fn new(url: &str, key: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            key: key.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl FactStore for RedisFactStore {
    async fn read(&self, limit: usize) -> Result<Vec<Fact>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(self.key.as_str()).await?;

        match raw {
            Some(json) => decode_facts(&json, limit),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, facts: &[Fact]) -> Result<(), StoreError> {
        let json = encode_facts(facts)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(self.key.as_str(), json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(texts: &[&str]) -> Vec<Fact> {
        texts
            .iter()
            .map(|t| Fact::from(FactsTransferRecord { fact: t.to_string() }))
            .collect()
    }

    #[test]
    fn stored_json_uses_the_record_shape() {
        let json = encode_facts(&facts(&["A", "B"])).unwrap();
        assert_eq!(json, r#"[{"fact":"A"},{"fact":"B"}]"#);

        assert_eq!(decode_facts(&json, 10).unwrap(), facts(&["A", "B"]));
        assert_eq!(decode_facts(&json, 1).unwrap(), facts(&["A"]));
    }

    #[test]
    fn foreign_json_is_a_codec_error() {
        assert!(matches!(decode_facts(r#"[{"text":"A"}]"#, 5), Err(StoreError::Codec(_))));
        assert!(matches!(decode_facts(r#"{"fact":"A"}"#, 5), Err(StoreError::Codec(_))));
    }

    #[test]
    fn opening_does_not_connect() {
        let store = RedisFactStore::new("redis://127.0.0.1:1/", "dogfacts:facts").unwrap();
        assert_eq!(store.key(), "dogfacts:facts");
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(RedisFactStore::new("not a redis url", "k").is_err());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_store_error() {
        let store = RedisFactStore::new("redis://127.0.0.1:1/", "k").unwrap();
        assert!(store.read(5).await.is_err());
    }
}
