//! `stockguard-testgen`
//!
//! **Responsibility:** boundary to an external text-generation service that
//! turns a specification into test code plus an edge-case list.
//!
//! The service is slow, fallible and returns weakly-structured text:
//! - [`TextGenerator`] is the seam to the service (no concrete network client here)
//! - [`parse_response`] extracts sections defensively, defaulting anything missing
//! - [`GenerationClient`] adds per-attempt timeouts, bounded retries, and
//!   degrades failures to an empty [`GeneratedSuite`]
//!
//! Nothing in this crate touches the ledger.

pub mod client;
pub mod error;
pub mod parse;
pub mod request;
pub mod suite;

pub use client::{GenerationClient, GenerationClientConfig, TextGenerator};
pub use error::GeneratorError;
pub use parse::parse_response;
pub use request::{GenerationConfig, GenerationRequest, TestDomain, TestType};
pub use suite::GeneratedSuite;
