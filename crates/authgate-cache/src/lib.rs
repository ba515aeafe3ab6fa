//! # authgate-cache
//!
//! Key/value provider implementations for AuthGate. Supports two modes:
//!
//! - **memory**: In-process map with per-entry deadlines, for single-node use
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
