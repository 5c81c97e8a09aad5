//! The stock ledger: sole writer of item quantities and the movement log.
//!
//! Concurrency model:
//! - the catalog index sits behind an `RwLock` that writers only read-lock to
//!   find an item's slot
//! - each item slot has its own `Mutex`; check-then-update-then-append runs
//!   entirely inside it, so movements for one item are linearizable while
//!   movements for different items proceed in parallel
//! - an `AtomicU64` stamps every accepted movement with a ledger-wide
//!   sequence number while the item lock is held

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockguard_core::{Aggregate, Event, ItemKey, MovementId};

use crate::error::LedgerError;
use crate::item::{
    Item, Movement, MovementKind, NewItem, RecordMovement, StockCommand, StockEvent, StockItem,
};

/// Reason recorded on the movement that carries an item's opening stock.
pub const OPENING_BALANCE_REASON: &str = "opening balance";

/// Outcome of an accepted movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementReceipt {
    pub movement: Movement,
    pub new_quantity: i64,
    /// Advisory: `new_quantity < safety_threshold`. Not an error.
    pub below_safety_threshold: bool,
}

/// Item state and its movements, read under one critical section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub item: Item,
    pub movements: Vec<Movement>,
}

#[derive(Debug)]
struct ItemSlot {
    item: StockItem,
    movements: Vec<Movement>,
}

#[derive(Debug, Default)]
struct Catalog {
    slots: HashMap<ItemKey, Arc<Mutex<ItemSlot>>>,
    order: Vec<ItemKey>,
}

/// In-process stock ledger.
///
/// Owned explicitly by its caller (share it with `Arc<Ledger>`); independent
/// ledgers never observe each other.
#[derive(Debug)]
pub struct Ledger {
    catalog: RwLock<Catalog>,
    seed: Vec<NewItem>,
    next_sequence: AtomicU64,
}

impl Ledger {
    /// Ledger with no items and nothing to reload on reset.
    pub fn empty() -> Self {
        Self {
            catalog: RwLock::new(Catalog::default()),
            seed: Vec::new(),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Ledger loaded with `seed`; `reset_catalog` reloads the same entries.
    pub fn new(seed: Vec<NewItem>) -> Result<Self, LedgerError> {
        let ledger = Self {
            catalog: RwLock::new(Catalog::default()),
            seed,
            next_sequence: AtomicU64::new(0),
        };
        let catalog = ledger.load_seed()?;
        *ledger.catalog.write().map_err(|_| LedgerError::Poisoned)? = catalog;
        Ok(ledger)
    }

    /// Ledger loaded with [`crate::catalog::default_catalog`].
    pub fn seeded() -> Result<Self, LedgerError> {
        Self::new(crate::catalog::default_catalog())
    }

    /// Add an item to the catalog.
    ///
    /// A positive opening quantity is recorded as an inbound movement so the
    /// log alone reproduces the live quantity.
    pub fn register_item(&self, new: NewItem) -> Result<Item, LedgerError> {
        let mut catalog = self.catalog.write().map_err(|_| LedgerError::Poisoned)?;
        if let Ok(key) = ItemKey::parse(new.key.as_str()) {
            if catalog.slots.contains_key(&key) {
                return Err(LedgerError::Conflict(format!("item {key} already exists")));
            }
        }

        // Built under the write lock so the opening movement's sequence is
        // never visible to readers before the item is.
        let slot = self.build_slot(&new)?;
        let item = slot.item.to_item();
        catalog.order.push(item.key.clone());
        catalog
            .slots
            .insert(item.key.clone(), Arc::new(Mutex::new(slot)));

        info!(item = %item.key, quantity = item.quantity, "item registered");
        Ok(item)
    }

    /// Apply one movement to an item.
    ///
    /// Rejections (`NotFound`, `InsufficientStock`, `Validation`) leave the
    /// item and the log untouched.
    pub fn apply_movement(
        &self,
        item_key: &ItemKey,
        magnitude: u64,
        kind: MovementKind,
        reason: impl Into<String>,
    ) -> Result<MovementReceipt, LedgerError> {
        let slot = self.slot(item_key)?;
        let mut slot = slot.lock().map_err(|_| LedgerError::Poisoned)?;

        match self.record(&mut slot, kind, magnitude, reason.into()) {
            Ok(receipt) => {
                debug!(
                    item = %item_key,
                    kind = %kind,
                    magnitude,
                    new_quantity = receipt.new_quantity,
                    sequence = receipt.movement.sequence,
                    "movement accepted"
                );
                if receipt.below_safety_threshold {
                    info!(
                        item = %item_key,
                        quantity = receipt.new_quantity,
                        safety_threshold = slot.item.safety_threshold(),
                        "stock below safety threshold"
                    );
                }
                Ok(receipt)
            }
            Err(err) => {
                debug!(item = %item_key, kind = %kind, magnitude, error = %err, "movement rejected");
                Err(err)
            }
        }
    }

    pub fn get_item(&self, item_key: &ItemKey) -> Result<Item, LedgerError> {
        let slot = self.slot(item_key)?;
        let slot = slot.lock().map_err(|_| LedgerError::Poisoned)?;
        Ok(slot.item.to_item())
    }

    /// All items in catalog insertion order.
    pub fn list_items(&self) -> Result<Vec<Item>, LedgerError> {
        let catalog = self.catalog.read().map_err(|_| LedgerError::Poisoned)?;
        let mut items = Vec::with_capacity(catalog.order.len());
        for key in &catalog.order {
            if let Some(slot) = catalog.slots.get(key) {
                let slot = slot.lock().map_err(|_| LedgerError::Poisoned)?;
                items.push(slot.item.to_item());
            }
        }
        Ok(items)
    }

    /// Accepted movements in acceptance order, for one item or for all.
    pub fn movement_history(&self, item_key: Option<&ItemKey>) -> Result<Vec<Movement>, LedgerError> {
        if let Some(key) = item_key {
            let slot = self.slot(key)?;
            let slot = slot.lock().map_err(|_| LedgerError::Poisoned)?;
            return Ok(slot.movements.clone());
        }

        // Every item lock is held at once so the merge is a prefix of
        // acceptance order. Writers hold a single item lock, so catalog order
        // here cannot deadlock with them.
        let catalog = self.catalog.read().map_err(|_| LedgerError::Poisoned)?;
        let mut guards = Vec::with_capacity(catalog.order.len());
        for key in &catalog.order {
            if let Some(slot) = catalog.slots.get(key) {
                guards.push(slot.lock().map_err(|_| LedgerError::Poisoned)?);
            }
        }

        let mut all: Vec<Movement> = guards
            .iter()
            .flat_map(|slot| slot.movements.iter().cloned())
            .collect();
        all.sort_by_key(|m| m.sequence);
        Ok(all)
    }

    /// Item and its movements read atomically with respect to writers.
    pub fn snapshot(&self, item_key: &ItemKey) -> Result<ItemSnapshot, LedgerError> {
        self.with_slot(item_key, |item, movements| ItemSnapshot {
            item: item.to_item(),
            movements: movements.to_vec(),
        })
    }

    /// Drop every item and movement, then reload the construction-time catalog.
    ///
    /// Test isolation only: writers racing with a reset may land in the
    /// discarded catalog.
    pub fn reset_catalog(&self) -> Result<(), LedgerError> {
        let fresh = self.load_seed()?;
        let mut catalog = self.catalog.write().map_err(|_| LedgerError::Poisoned)?;
        *catalog = fresh;
        info!(items = catalog.order.len(), "catalog reset");
        Ok(())
    }

    /// Run `f` against the aggregate and its log inside the item's critical section.
    pub(crate) fn with_slot<R>(
        &self,
        item_key: &ItemKey,
        f: impl FnOnce(&StockItem, &[Movement]) -> R,
    ) -> Result<R, LedgerError> {
        let slot = self.slot(item_key)?;
        let slot = slot.lock().map_err(|_| LedgerError::Poisoned)?;
        Ok(f(&slot.item, &slot.movements))
    }

    #[cfg(test)]
    pub(crate) fn overwrite_quantity(&self, item_key: &ItemKey, quantity: i64) {
        let slot = self.slot(item_key).unwrap();
        slot.lock().unwrap().item.overwrite_quantity(quantity);
    }

    fn slot(&self, item_key: &ItemKey) -> Result<Arc<Mutex<ItemSlot>>, LedgerError> {
        let catalog = self.catalog.read().map_err(|_| LedgerError::Poisoned)?;
        catalog
            .slots
            .get(item_key)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(item_key.clone()))
    }

    fn load_seed(&self) -> Result<Catalog, LedgerError> {
        let mut catalog = Catalog::default();
        for new in &self.seed {
            let slot = self.build_slot(new)?;
            let key = slot.item.key().clone();
            if catalog.slots.contains_key(&key) {
                return Err(LedgerError::Conflict(format!("item {key} already exists")));
            }
            catalog.order.push(key.clone());
            catalog.slots.insert(key, Arc::new(Mutex::new(slot)));
        }
        Ok(catalog)
    }

    fn build_slot(&self, new: &NewItem) -> Result<ItemSlot, LedgerError> {
        let item = StockItem::register(new)?;
        let mut slot = ItemSlot {
            item,
            movements: Vec::new(),
        };
        if new.opening_quantity > 0 {
            self.record(
                &mut slot,
                MovementKind::Inbound,
                new.opening_quantity as u64,
                OPENING_BALANCE_REASON.to_string(),
            )?;
        }
        Ok(slot)
    }

    /// Decide, apply and append one movement. Caller holds the slot lock.
    fn record(
        &self,
        slot: &mut ItemSlot,
        kind: MovementKind,
        magnitude: u64,
        reason: String,
    ) -> Result<MovementReceipt, LedgerError> {
        let item_key = slot.item.key().clone();
        let command = StockCommand::RecordMovement(RecordMovement {
            movement_id: MovementId::new(),
            item_key: item_key.clone(),
            kind,
            magnitude,
            reason,
            occurred_at: Utc::now(),
        });

        let events = slot
            .item
            .handle(&command)
            .map_err(|e| LedgerError::from_domain(&item_key, e))?;

        let mut last = None;
        for event in &events {
            let StockEvent::MovementRecorded(recorded) = event;
            let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
            slot.item.apply(event);
            let movement = Movement::recorded(sequence, recorded);
            slot.movements.push(movement.clone());
            debug!(event_type = event.event_type(), sequence, "event applied");
            last = Some(movement);
        }

        let movement = last.ok_or_else(|| {
            LedgerError::InvariantViolation("movement command produced no event".to_string())
        })?;
        let new_quantity = slot.item.quantity();

        Ok(MovementReceipt {
            movement,
            new_quantity,
            below_safety_threshold: new_quantity < slot.item.safety_threshold(),
        })
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::empty()
    }
}
