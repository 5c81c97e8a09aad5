use thiserror::Error;

use stockguard_core::{DomainError, ItemKey};

/// Error returned by ledger operations.
///
/// Every variant is recoverable: the ledger state is unchanged when one is
/// returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No catalog item has this key.
    #[error("item not found: {0}")]
    NotFound(ItemKey),

    /// An outbound movement would drive the quantity below zero.
    #[error("insufficient stock for {item_key}: available {available}, requested {requested}")]
    InsufficientStock {
        item_key: ItemKey,
        available: i64,
        requested: u64,
    },

    /// Malformed input (magnitude out of range, bad key, oversized reason...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Catalog conflict (e.g. registering a duplicate key).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A writer panicked while holding a ledger lock.
    #[error("ledger lock poisoned")]
    Poisoned,
}

impl LedgerError {
    /// Map a domain failure raised while handling a command for `item_key`.
    pub fn from_domain(item_key: &ItemKey, err: DomainError) -> Self {
        match err {
            DomainError::InsufficientStock {
                available,
                requested,
            } => LedgerError::InsufficientStock {
                item_key: item_key.clone(),
                available,
                requested,
            },
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                LedgerError::Validation(msg)
            }
            DomainError::InvariantViolation(msg) => LedgerError::InvariantViolation(msg),
        }
    }

    /// Stable machine-readable code for logs and HTTP bodies.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::NotFound(_) => "not_found",
            LedgerError::InsufficientStock { .. } => "insufficient_stock",
            LedgerError::Validation(_) => "validation_error",
            LedgerError::Conflict(_) => "conflict",
            LedgerError::InvariantViolation(_) => "invariant_violation",
            LedgerError::Poisoned => "poisoned",
        }
    }
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                LedgerError::Validation(msg)
            }
            other => LedgerError::InvariantViolation(other.to_string()),
        }
    }
}
