//! Data access for the dog facts client: a typed HTTP request executor, remote
//! and cached data sources behind a write-through gateway, and a reactive
//! value container for publishing results to observers.

pub mod api;
pub mod configs;
pub mod connections;
pub mod data;
pub mod domain;
pub mod loggers;
pub mod model;
pub mod observing;
pub mod presentation;
pub mod retrieve;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiVersion, Endpoint};
pub use configs::{load_facts_config, ConfigError, FactsConfig};
pub use data::{CacheDataSource, DataSource, FactsGateway, FactsProvider, GatewayConfiguration, RemoteDataSource, Source};
pub use domain::LoadFactsUseCase;
pub use loggers::{LayerLogger, LoggerLocal, LoggerLocalOptions, ProjectLayer};
pub use model::{Fact, FactsTransferRecord, FactsTransferRecords};
pub use observing::{DeliveryContext, ReactiveValue, SubscriptionHandle};
pub use presentation::{FactItem, FactListModel};
pub use retrieve::{ErrorKind, ErrorRecord, NetworkError, NetworkRequestExecutor, Request, RequestExecutor};
