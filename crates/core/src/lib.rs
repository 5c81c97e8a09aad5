//! `stockguard-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no locking, no IO, no HTTP).

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{ItemKey, MovementId};
