//! # Facts Configuration
//!
//! Settings are layered in a fixed order, later layers winning:
//!
//! 1. built-in defaults,
//! 2. an optional JSON file read through `more-config`,
//! 3. `DOGFACTS_*` environment variables (a `.env` file is loaded first when present).
//!
//! JSON sections are flattened to `Section:Key` and matched case-insensitively:
//!
//! ```json
//! {
//!   "Api":     { "BaseUrl": "https://dog-facts-api.herokuapp.com/api", "Version": "v1" },
//!   "Facts":   { "Count": 20, "Source": "remote", "WriteThrough": false },
//!   "Cache":   { "Backend": "memory", "RedisUrl": "redis://127.0.0.1/", "RedisKey": "dogfacts:facts" },
//!   "Logging": { "AppName": "dog-facts", "LogDir": "logs" }
//! }
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use config::{ext::*, *};

use crate::api::{ApiVersion, DEFAULT_BASE_URL};
use crate::connections::{FactStore, MemoryFactStore, StoreError};
use crate::data::{CacheDataSource, FactsGateway, GatewayConfiguration, RemoteDataSource};
use crate::loggers::LoggerLocal;
use crate::retrieve::{shared_client, NetworkRequestExecutor};

pub const ENV_PREFIX: &str = "DOGFACTS_";
pub const DEFAULT_FACTS_COUNT: u32 = 20;
pub const DEFAULT_APP_NAME: &str = "dog-facts";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";
pub const DEFAULT_REDIS_KEY: &str = "dogfacts:facts";

/// Lower-cased file key and environment suffix for every setting.
const SETTINGS: &[(&str, &str)] = &[
    ("api:baseurl", "BASE_URL"),
    ("api:version", "API_VERSION"),
    ("facts:count", "COUNT"),
    ("facts:source", "SOURCE"),
    ("facts:writethrough", "WRITE_THROUGH"),
    ("cache:backend", "CACHE_BACKEND"),
    ("cache:redisurl", "REDIS_URL"),
    ("cache:rediskey", "REDIS_KEY"),
    ("logging:appname", "APP_NAME"),
    ("logging:logdir", "LOG_DIR"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file could not be read: {0}")]
    Source(String),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue { key: String, value: String, reason: String },

    #[error("Cache backend could not be opened: {0}")]
    Backend(#[from] StoreError),

    #[error("Cache backend {0:?} is not available in this build")]
    UnsupportedBackend(CacheBackend),
}

/// Which data source the application loads from by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Cache,
    #[default]
    Remote,
}

/// Storage behind the cache data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactsConfig {
    pub base_url: String,
    pub api_version: ApiVersion,
    pub facts_count: u32,
    pub write_through: bool,
    pub source: SourceKind,
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    pub redis_key: String,
    pub app_name: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: ApiVersion::V1,
            facts_count: DEFAULT_FACTS_COUNT,
            write_through: false,
            source: SourceKind::Remote,
            cache_backend: CacheBackend::Memory,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            redis_key: DEFAULT_REDIS_KEY.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            log_dir: None,
        }
    }
}

impl fmt::Display for FactsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FactsConfig
    Base url: {},
    Api version: {},
    Count: {},
    Source: {:?} (write-through: {}),
    Cache backend: {:?},
    Log dir: {:?}
",
            self.base_url,
            self.api_version.segment(),
            self.facts_count,
            self.source,
            self.write_through,
            self.cache_backend,
            self.log_dir
        )
    }
}

impl FactsConfig {
    /// The gateway settings for a default load.
    pub fn gateway_configuration(&self) -> GatewayConfiguration {
        match self.source {
            SourceKind::Cache => GatewayConfiguration::cache(self.facts_count),
            SourceKind::Remote => GatewayConfiguration::remote(self.facts_count, self.write_through),
        }
    }

    /// Applies `Section:Key` values from a configuration file. Unknown keys are ignored.
    pub fn apply_file_options(&mut self, options: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        for (key, value) in options {
            let key = key.to_lowercase();
            if SETTINGS.iter().any(|(name, _)| *name == key) {
                self.set(&key, value)?;
            }
        }
        Ok(())
    }

    /// Applies `DOGFACTS_*` overrides from `vars`. Other variables are ignored.
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if let Some((key, _)) = SETTINGS.iter().find(|(_, env_suffix)| *env_suffix == suffix) {
                self.set(key, &value)?;
            }
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "api:baseurl" => self.base_url = value.to_string(),
            "api:version" => {
                self.api_version = ApiVersion::from_segment(value).ok_or_else(|| invalid("unknown api version"))?
            }
            "facts:count" => self.facts_count = value.parse().map_err(|_| invalid("expected a non-negative integer"))?,
            "facts:source" => {
                self.source = match value.to_lowercase().as_str() {
                    "cache" => SourceKind::Cache,
                    "remote" => SourceKind::Remote,
                    _ => return Err(invalid("expected cache or remote")),
                }
            }
            "facts:writethrough" => self.write_through = parse_bool(value).ok_or_else(|| invalid("expected a boolean"))?,
            "cache:backend" => {
                self.cache_backend = match value.to_lowercase().as_str() {
                    "memory" => CacheBackend::Memory,
                    "redis" => CacheBackend::Redis,
                    _ => return Err(invalid("expected memory or redis")),
                }
            }
            "cache:redisurl" => self.redis_url = value.to_string(),
            "cache:rediskey" => self.redis_key = value.to_string(),
            "logging:appname" => self.app_name = value.to_string(),
            "logging:logdir" => self.log_dir = (!value.is_empty()).then(|| PathBuf::from(value)),
            _ => {}
        }
        Ok(())
    }

    /// Opens the configured cache backend. Redis is not contacted until first use.
    pub fn fact_store(&self) -> Result<Arc<dyn FactStore>, ConfigError> {
        match self.cache_backend {
            CacheBackend::Memory => Ok(Arc::new(MemoryFactStore::new())),
            #[cfg(feature = "connections")]
            CacheBackend::Redis => Ok(Arc::new(crate::connections::RedisFactStore::new(
                &self.redis_url,
                &self.redis_key,
            )?)),
            #[cfg(not(feature = "connections"))]
            CacheBackend::Redis => Err(ConfigError::UnsupportedBackend(CacheBackend::Redis)),
        }
    }

    /// Wires the production gateway: the HTTP executor and the configured cache.
    pub fn build_gateway(&self, logger: Arc<LoggerLocal>) -> Result<FactsGateway, ConfigError> {
        let executor = NetworkRequestExecutor::with_client(shared_client(), &self.base_url, self.api_version, logger.clone());
        let remote = RemoteDataSource::new(executor, logger.clone());
        let cache = CacheDataSource::new(self.fact_store()?, logger.clone());
        Ok(FactsGateway::new(remote, cache, logger))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Reads `path` (when given and present) into flattened `Section:Key` options.
pub fn read_file_options(path: Option<&Path>) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut options: BTreeMap<String, String> = BTreeMap::new();
    let Some(path) = path else {
        return Ok(options);
    };

    let file = path.to_string_lossy().to_string();
    let config_data: Box<dyn ConfigurationRoot> = DefaultConfigurationBuilder::new()
        .add_json_file(&file.is().optional())
        .build()
        .map_err(|e| ConfigError::Source(format!("{}: {:?}", file, e)))?;

    for (key, value) in config_data.iter(None) {
        options.insert(key.to_string(), value.to_string());
    }
    Ok(options)
}

/// Loads the application configuration: defaults, then `path`, then the environment.
pub fn load_facts_config(path: Option<&Path>) -> Result<FactsConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let mut config = FactsConfig::default();
    config.apply_file_options(&read_file_options(path)?)?;
    config.apply_env_overrides(env::vars())?;
    log::debug!("Loaded configuration: {:?}", config);
    Ok(config)
}
