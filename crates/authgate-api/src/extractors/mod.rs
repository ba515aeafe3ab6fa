//! Custom request extractors.

pub mod validated;

pub use validated::ValidatedJson;
