//! Shared test utilities used across kaiso crates.

pub mod ci;
pub mod tracing;
