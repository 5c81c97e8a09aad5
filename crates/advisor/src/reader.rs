use std::sync::Arc;

use stockguard_core::ItemKey;
use stockguard_inventory::{ItemSnapshot, Ledger, LedgerError};

/// Read access to item state and history.
///
/// The advisor only needs consistent per-item snapshots; keeping this a trait
/// lets it run against a fixed history in tests.
pub trait StockReader: Send + Sync {
    fn snapshot(&self, item_key: &ItemKey) -> Result<ItemSnapshot, LedgerError>;

    /// Keys of every catalog item, in catalog order.
    fn item_keys(&self) -> Result<Vec<ItemKey>, LedgerError>;
}

impl StockReader for Ledger {
    fn snapshot(&self, item_key: &ItemKey) -> Result<ItemSnapshot, LedgerError> {
        Ledger::snapshot(self, item_key)
    }

    fn item_keys(&self) -> Result<Vec<ItemKey>, LedgerError> {
        Ok(self.list_items()?.into_iter().map(|i| i.key).collect())
    }
}

impl<R> StockReader for Arc<R>
where
    R: StockReader + ?Sized,
{
    fn snapshot(&self, item_key: &ItemKey) -> Result<ItemSnapshot, LedgerError> {
        (**self).snapshot(item_key)
    }

    fn item_keys(&self) -> Result<Vec<ItemKey>, LedgerError> {
        (**self).item_keys()
    }
}
