//! Core traits implemented by infrastructure crates.

pub mod cache;

pub use cache::CacheProvider;
