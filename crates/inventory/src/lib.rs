//! Inventory stock ledger.
//!
//! - `item`: the `StockItem` aggregate, movements and their events (pure logic)
//! - `ledger`: the concurrent, in-process ledger that owns items and the log
//! - `integrity`: replay-based drift detection over the ledger

pub mod catalog;
pub mod error;
pub mod integrity;
pub mod item;
pub mod ledger;

pub use catalog::default_catalog;
pub use error::LedgerError;
pub use integrity::{IntegrityDrift, IntegrityReport, IntegrityVerifier, QUANTITY_EPSILON};
pub use item::{
    Item, Movement, MovementKind, MovementRecorded, NewItem, RecordMovement, StockCommand,
    StockEvent, StockItem,
};
pub use ledger::{ItemSnapshot, Ledger, MovementReceipt, OPENING_BALANCE_REASON};
