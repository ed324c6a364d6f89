//! # Request Executor
//!
//! Performs one typed GET request and classifies every way it can fail.
//!
//! The pipeline is strictly ordered and stops at the first failure:
//! URL resolution, transport, status code, body presence, decoding. Each
//! failure is logged on the network layer and returned as an [`ErrorRecord`].
//! There are no retries and no per-call timeout; a request that was sent runs
//! to completion or fails once.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use static_init::dynamic;
use std::any::type_name;
use std::sync::Arc;
use url::Url;

use super::errors::{ErrorRecord, NetworkError};
use super::request::Request;
use crate::api::{ApiVersion, DEFAULT_BASE_URL};
use crate::loggers::{LayerLogger, LoggerLocal, ProjectLayer};

/// Anything able to turn a [`Request`] into a decoded value.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Executes `request` and decodes the body as `T`.
    async fn execute<T>(&self, request: Request) -> Result<T, ErrorRecord>
    where
        T: DeserializeOwned + Send + 'static;
}

#[dynamic(lazy)]
/// The process-wide HTTP client, built on first use.
static SHARED_CLIENT: reqwest::Client = reqwest::Client::builder()
    .user_agent(concat!("lib_facts/", env!("CARGO_PKG_VERSION")))
    .build()
    .unwrap_or_default();

/// A handle to the HTTP client shared by every executor of a process.
///
/// `reqwest::Client` pools connections internally and clones share that pool,
/// so every executor built from this handle reuses the same connections.
pub fn shared_client() -> reqwest::Client {
    (*SHARED_CLIENT).clone()
}

/// The `reqwest`-backed executor.
#[derive(Clone)]
pub struct NetworkRequestExecutor {
    /// Shared, connection-pooling HTTP client.
    client: reqwest::Client,
    /// Base URL the versioned endpoint paths are joined to.
    base_url: String,
    /// API version segment inserted before every endpoint path.
    version: ApiVersion,
    logger: Arc<LoggerLocal>,
}

impl NetworkRequestExecutor {
    /// Creates an executor against the production API on the shared client.
    pub fn new(logger: Arc<LoggerLocal>) -> Self {
        Self::with_client(shared_client(), DEFAULT_BASE_URL, ApiVersion::V1, logger)
    }

    /// Creates an executor reusing an existing client.
    ///
    /// The base URL is not validated here: a malformed one surfaces as
    /// `InvalidUrl` on the first `execute` call.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        version: ApiVersion,
        logger: Arc<LoggerLocal>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            version,
            logger,
        }
    }

    /// Resolves endpoint, version and query parameters into an absolute http(s) URL.
    pub fn resolve_url(&self, request: &Request) -> Result<Url, NetworkError> {
        let raw = request.endpoint().url_string(&self.base_url, self.version);
        let mut url = Url::parse(&raw).map_err(|_| NetworkError::InvalidUrl)?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(NetworkError::InvalidUrl);
        }

        if !request.query().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in request.query() {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    async fn fail<T>(&self, log: &LayerLogger, error: NetworkError, details: String) -> Result<T, ErrorRecord> {
        let record = error.record(Some(&details));
        log.error(&record.message, Some(record.as_log_extras())).await;
        Err(record)
    }
}

#[async_trait]
impl RequestExecutor for NetworkRequestExecutor {
    async fn execute<T>(&self, request: Request) -> Result<T, ErrorRecord>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let log = self.logger.for_layer(ProjectLayer::CoreNetwork);

        // 1. Resolve the full URL; nothing touches the network if this fails.
        let url = match self.resolve_url(&request) {
            Ok(url) => url,
            Err(e) => {
                let details = format!("URL: {}", request.endpoint().url_string(&self.base_url, self.version));
                return self.fail(&log, e, details).await;
            }
        };

        log.info(&format!("Start executing: {}", url), None).await;

        // 2. Transport
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return self.fail(&log, NetworkError::Transport(e.to_string()), format!("URL: {}", url)).await,
        };

        // 3. Status
        let status = response.status();
        if !status.is_success() {
            return self
                .fail(&log, NetworkError::InvalidStatusCode(status.as_u16()), format!("URL: {}", url))
                .await;
        }

        // 4. Body
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return self.fail(&log, NetworkError::Transport(e.to_string()), format!("URL: {}", url)).await,
        };
        if body.is_empty() {
            return self.fail(&log, NetworkError::EmptyBody, format!("URL: {}", url)).await;
        }

        // 5. Decode
        match serde_json::from_slice::<T>(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                let target = type_name::<T>().to_string();
                self.fail(&log, NetworkError::Decode(target), format!("Cause: {}", e)).await
            }
        }
    }
}
