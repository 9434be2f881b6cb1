//! Tracing/logging setup shared by the service binary and tests.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::{LogFormat, init};
