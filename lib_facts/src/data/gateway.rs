//! # Facts Gateway
//!
//! Picks the data path for a load and applies the write-through policy.
//!
//! With write-through enabled, facts fetched from the remote source are handed
//! to the cache and the caller receives the *save* result. A cache write that
//! fails after a successful fetch is therefore reported as a failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use super::cache::CacheDataSource;
use super::remote::RemoteDataSource;
use super::source::DataSource;
use crate::loggers::{LoggerLocal, ProjectLayer};
use crate::model::Fact;
use crate::retrieve::ErrorRecord;

/// Where a load reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Local storage only.
    Cache,
    /// The HTTP API; `write_through` also stores the fetched facts in the cache.
    Remote { write_through: bool },
}

impl Default for Source {
    fn default() -> Self {
        Source::Remote { write_through: false }
    }
}

/// Per-call settings for [`FactsGateway::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GatewayConfiguration {
    pub source: Source,
    pub count: u32,
}

impl GatewayConfiguration {
    pub fn cache(count: u32) -> Self {
        Self { source: Source::Cache, count }
    }

    pub fn remote(count: u32, write_through: bool) -> Self {
        Self { source: Source::Remote { write_through }, count }
    }
}

/// Anything that can answer a facts load for a given configuration.
#[async_trait]
pub trait FactsProvider: Send + Sync {
    async fn load_facts(&self, config: GatewayConfiguration) -> Result<Vec<Fact>, ErrorRecord>;
}

pub struct FactsGateway<R = RemoteDataSource, C = CacheDataSource> {
    remote: R,
    cache: C,
    logger: Arc<LoggerLocal>,
}

impl<R: DataSource, C: DataSource> FactsGateway<R, C> {
    pub fn new(remote: R, cache: C, logger: Arc<LoggerLocal>) -> Self {
        Self { remote, cache, logger }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Runs one load. Errors from either source are returned as received.
    pub async fn load(&self, config: GatewayConfiguration) -> Result<Vec<Fact>, ErrorRecord> {
        let log = self.logger.for_layer(ProjectLayer::Gateway);

        let write_through = match config.source {
            Source::Cache => return self.cache.load(config.count).await,
            Source::Remote { write_through } => write_through,
        };

        log.info("Sending a command to download facts from the remote source.", Some(json!({ "count": config.count })))
            .await;
        if !write_through {
            return self.remote.load(config.count).await;
        }

        log.info("The facts that will be loaded will be cached in the local storage.", None)
            .await;
        let facts = self.remote.load(config.count).await?;

        log.info("Sending a command to cache facts from the remote in the local storage.", Some(json!({ "facts": facts.len() })))
            .await;
        self.cache.save(facts).await
    }
}

#[async_trait]
impl<R: DataSource, C: DataSource> FactsProvider for FactsGateway<R, C> {
    async fn load_facts(&self, config: GatewayConfiguration) -> Result<Vec<Fact>, ErrorRecord> {
        self.load(config).await
    }
}
