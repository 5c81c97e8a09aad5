use thiserror::Error;

use stockguard_inventory::LedgerError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("invalid forecast config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
