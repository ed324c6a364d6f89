//! # Remote Data Source
//!
//! Loads facts from the HTTP API through a [`RequestExecutor`].

use async_trait::async_trait;
use std::sync::Arc;

use super::source::DataSource;
use crate::api::{Endpoint, COUNT_QUERY_NAME};
use crate::loggers::{LoggerLocal, ProjectLayer};
use crate::model::{Fact, FactsTransferRecords};
use crate::retrieve::{ErrorRecord, NetworkRequestExecutor, Request, RequestExecutor};

/// The network-backed data source. Read-only.
pub struct RemoteDataSource<E = NetworkRequestExecutor> {
    executor: E,
    logger: Arc<LoggerLocal>,
}

impl<E: RequestExecutor> RemoteDataSource<E> {
    pub fn new(executor: E, logger: Arc<LoggerLocal>) -> Self {
        Self { executor, logger }
    }

    /// The request sent for a load of `count` facts.
    pub fn facts_request(count: u32) -> Request {
        Request::new(Endpoint::GetFacts).with_query(COUNT_QUERY_NAME, count)
    }
}

#[async_trait]
impl<E: RequestExecutor> DataSource for RemoteDataSource<E> {
    async fn load(&self, count: u32) -> Result<Vec<Fact>, ErrorRecord> {
        let log = self.logger.for_layer(ProjectLayer::DataSource);
        let request = Self::facts_request(count);
        log.debug(&format!("Request has been generated: {:?}", request), None).await;

        match self.executor.execute::<FactsTransferRecords>(request).await {
            Ok(records) => Ok(records.into_iter().map(Fact::from).collect()),
            Err(error) => {
                log.debug(
                    &format!("Received error: {}. Passing it on unchanged.", error.message),
                    Some(error.as_log_extras()),
                )
                .await;
                Err(error)
            }
        }
    }

    /// Saving to the remote API is not supported; logs and hands the facts back untouched.
    async fn save(&self, facts: Vec<Fact>) -> Result<Vec<Fact>, ErrorRecord> {
        self.logger
            .for_layer(ProjectLayer::DataSource)
            .error(
                "save is not implemented for the remote source",
                Some(serde_json::json!({ "facts": facts.len() })),
            )
            .await;
        Ok(facts)
    }
}
