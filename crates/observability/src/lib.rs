//! Tracing/logging setup shared by StockGuard binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::{LogFormat, init_with};
