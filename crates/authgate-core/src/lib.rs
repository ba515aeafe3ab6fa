//! # authgate-core
//!
//! Core crate for AuthGate. Contains configuration schemas, the message
//! types exchanged with the user persistence service over the bus, the
//! key/value store trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AuthGate crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
