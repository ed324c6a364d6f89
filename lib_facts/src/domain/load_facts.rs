//! # Load Facts
//!
//! The "show dog facts" scenario: turns a requested count into a gateway
//! configuration and forwards the gateway's result as is.

use serde_json::json;
use std::sync::Arc;

use crate::data::{FactsProvider, GatewayConfiguration, Source};
use crate::loggers::{LoggerLocal, ProjectLayer};
use crate::model::Fact;
use crate::retrieve::ErrorRecord;

pub struct LoadFactsUseCase {
    provider: Arc<dyn FactsProvider>,
    source: Source,
    logger: Arc<LoggerLocal>,
}

impl LoadFactsUseCase {
    /// Loads from the remote API without caching the result.
    pub fn new(provider: Arc<dyn FactsProvider>, logger: Arc<LoggerLocal>) -> Self {
        Self {
            provider,
            source: Source::default(),
            logger,
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub async fn execute(&self, count: u32) -> Result<Vec<Fact>, ErrorRecord> {
        let configuration = GatewayConfiguration {
            source: self.source,
            count,
        };
        self.logger
            .for_layer(ProjectLayer::Domain)
            .info(
                &format!("Execute the script with configuration: {:?}", configuration),
                Some(json!({ "count": count })),
            )
            .await;
        self.provider.load_facts(configuration).await
    }
}
