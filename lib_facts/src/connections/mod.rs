//! # Connections Module
//!
//! Storage backends for cached facts.

/// The store contract and the in-memory backend.
pub mod fact_store;

/// Redis-backed fact store.
#[cfg(feature = "connections")]
pub mod cache_redis;

pub use fact_store::{FactStore, MemoryFactStore, StoreError};

#[cfg(feature = "connections")]
pub use cache_redis::RedisFactStore;
