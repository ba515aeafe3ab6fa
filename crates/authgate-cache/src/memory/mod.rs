//! In-memory provider with per-entry deadlines.

pub mod store;
pub mod sweeper;

pub use store::MemoryCacheProvider;
pub use sweeper::ExpirySweeper;
