//! HTTP API: routing and request/response mapping over the stock ledger.
//!
//! This is the surface a driving harness talks to; it owns no state of its
//! own beyond the injected [`app::services::AppServices`].

pub mod app;
pub mod config;
