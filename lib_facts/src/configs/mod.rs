//! # Configuration
//!
//! Layered application settings: defaults, an optional JSON file and
//! `DOGFACTS_*` environment overrides.

pub mod config_sys;

pub use config_sys::{
    load_facts_config, read_file_options, CacheBackend, ConfigError, FactsConfig, SourceKind, DEFAULT_FACTS_COUNT,
};
