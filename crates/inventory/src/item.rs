use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockguard_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, Event, ItemKey, MovementId,
};

/// Longest free-text reason accepted on a movement.
pub const MAX_REASON_LEN: usize = 1024;

/// Direction of a stock movement.
///
/// Magnitudes are always unsigned; the sign is derived from the kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Inbound,
    Outbound,
    Adjustment,
}

impl MovementKind {
    /// Signed quantity change for `magnitude` units of this kind.
    pub fn delta(self, magnitude: i64) -> i64 {
        match self {
            MovementKind::Outbound => -magnitude,
            MovementKind::Inbound | MovementKind::Adjustment => magnitude,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Inbound => "inbound",
            MovementKind::Outbound => "outbound",
            MovementKind::Adjustment => "adjustment",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inbound" => Ok(MovementKind::Inbound),
            "outbound" => Ok(MovementKind::Outbound),
            "adjustment" => Ok(MovementKind::Adjustment),
            _ => Err(DomainError::validation(
                "kind must be one of: inbound, outbound, adjustment",
            )),
        }
    }
}

/// Immutable audit record of one accepted quantity change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    /// Ledger-wide acceptance position; strictly increasing in acceptance order.
    pub sequence: u64,
    pub item_key: ItemKey,
    pub kind: MovementKind,
    pub magnitude: u64,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

impl Movement {
    pub(crate) fn recorded(sequence: u64, event: &MovementRecorded) -> Self {
        Self {
            id: event.movement_id,
            sequence,
            item_key: event.item_key.clone(),
            kind: event.kind,
            magnitude: event.magnitude,
            reason: event.reason.clone(),
            occurred_at: event.occurred_at,
        }
    }

    /// Signed effect of this movement on the item's quantity.
    pub fn delta(&self) -> i64 {
        // Magnitudes above i64::MAX are rejected before a movement is recorded.
        self.kind.delta(self.magnitude as i64)
    }
}

/// Read-side view of an item (what callers get back from the ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: ItemKey,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub safety_threshold: i64,
    pub lead_time_days: u32,
    /// Unit price in minor currency units (e.g. cents).
    pub unit_price: u64,
}

/// Catalog entry used to register an item at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub key: String,
    pub name: String,
    pub sku: String,
    /// Recorded as an `inbound` "opening balance" movement when positive.
    pub opening_quantity: i64,
    pub safety_threshold: i64,
    pub lead_time_days: u32,
    pub unit_price: u64,
}

/// Aggregate root: StockItem.
///
/// Holds the live quantity for one catalog item. Quantity only changes by
/// applying `MovementRecorded` events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockItem {
    key: ItemKey,
    name: String,
    sku: String,
    quantity: i64,
    safety_threshold: i64,
    lead_time_days: u32,
    unit_price: u64,
    version: u64,
}

impl StockItem {
    /// Validate a catalog entry and build the aggregate with zero stock.
    ///
    /// Opening stock is not set here: it is recorded as a movement so that the
    /// movement log alone reproduces the quantity.
    pub fn register(new: &NewItem) -> DomainResult<Self> {
        let key = ItemKey::parse(new.key.clone())?;
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if new.sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if new.opening_quantity < 0 {
            return Err(DomainError::validation("opening quantity cannot be negative"));
        }
        if new.safety_threshold < 0 {
            return Err(DomainError::validation("safety threshold cannot be negative"));
        }

        Ok(Self {
            key,
            name: new.name.trim().to_string(),
            sku: new.sku.trim().to_string(),
            quantity: 0,
            safety_threshold: new.safety_threshold,
            lead_time_days: new.lead_time_days,
            unit_price: new.unit_price,
            version: 0,
        })
    }

    /// Same item attributes, zero quantity, no applied movements.
    ///
    /// Starting point for replaying the movement log.
    pub fn replica(&self) -> Self {
        Self {
            quantity: 0,
            version: 0,
            ..self.clone()
        }
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn safety_threshold(&self) -> i64 {
        self.safety_threshold
    }

    pub fn to_item(&self) -> Item {
        Item {
            key: self.key.clone(),
            name: self.name.clone(),
            sku: self.sku.clone(),
            quantity: self.quantity,
            safety_threshold: self.safety_threshold,
            lead_time_days: self.lead_time_days,
            unit_price: self.unit_price,
        }
    }

    #[cfg(test)]
    pub(crate) fn overwrite_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }
}

impl AggregateRoot for StockItem {
    type Id = ItemKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RecordMovement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMovement {
    pub movement_id: MovementId,
    pub item_key: ItemKey,
    pub kind: MovementKind,
    pub magnitude: u64,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    RecordMovement(RecordMovement),
}

/// Event: MovementRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecorded {
    pub movement_id: MovementId,
    pub item_key: ItemKey,
    pub kind: MovementKind,
    pub magnitude: u64,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockEvent {
    MovementRecorded(MovementRecorded),
}

impl From<&Movement> for StockEvent {
    fn from(m: &Movement) -> Self {
        StockEvent::MovementRecorded(MovementRecorded {
            movement_id: m.id,
            item_key: m.item_key.clone(),
            kind: m.kind,
            magnitude: m.magnitude,
            reason: m.reason.clone(),
            occurred_at: m.occurred_at,
        })
    }
}

impl Event for StockEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StockEvent::MovementRecorded(_) => "inventory.item.movement_recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockEvent::MovementRecorded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StockItem {
    type Command = StockCommand;
    type Event = StockEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StockEvent::MovementRecorded(e) => {
                self.quantity = self
                    .quantity
                    .saturating_add(e.kind.delta(e.magnitude as i64));
            }
        }

        // +1 per applied movement.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockCommand::RecordMovement(cmd) => self.handle_record(cmd),
        }
    }
}

impl StockItem {
    fn ensure_item_key(&self, item_key: &ItemKey) -> Result<(), DomainError> {
        if &self.key != item_key {
            return Err(DomainError::invariant("item_key mismatch"));
        }
        Ok(())
    }

    fn handle_record(&self, cmd: &RecordMovement) -> Result<Vec<StockEvent>, DomainError> {
        self.ensure_item_key(&cmd.item_key)?;

        let magnitude = i64::try_from(cmd.magnitude)
            .map_err(|_| DomainError::validation("magnitude exceeds the representable range"))?;

        if cmd.reason.len() > MAX_REASON_LEN {
            return Err(DomainError::validation(format!(
                "reason longer than {MAX_REASON_LEN} bytes"
            )));
        }

        let new_quantity = self
            .quantity
            .checked_add(cmd.kind.delta(magnitude))
            .ok_or_else(|| DomainError::validation("quantity would overflow"))?;

        if new_quantity < 0 {
            return Err(DomainError::insufficient_stock(self.quantity, cmd.magnitude));
        }

        Ok(vec![StockEvent::MovementRecorded(MovementRecorded {
            movement_id: cmd.movement_id,
            item_key: cmd.item_key.clone(),
            kind: cmd.kind,
            magnitude: cmd.magnitude,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn new_item(opening: i64, threshold: i64) -> NewItem {
        NewItem {
            key: "ITEM-T".to_string(),
            name: "Test item".to_string(),
            sku: "TST-1".to_string(),
            opening_quantity: opening,
            safety_threshold: threshold,
            lead_time_days: 5,
            unit_price: 100,
        }
    }

    fn record(item: &StockItem, kind: MovementKind, magnitude: u64) -> StockCommand {
        StockCommand::RecordMovement(RecordMovement {
            movement_id: MovementId::new(),
            item_key: item.key().clone(),
            kind,
            magnitude,
            reason: "test".to_string(),
            occurred_at: Utc::now(),
        })
    }

    fn execute(item: &mut StockItem, kind: MovementKind, magnitude: u64) -> DomainResult<()> {
        let events = item.handle(&record(item, kind, magnitude))?;
        for e in &events {
            item.apply(e);
        }
        Ok(())
    }

    #[test]
    fn register_starts_at_zero_stock() {
        let item = StockItem::register(&new_item(40, 10)).unwrap();
        assert_eq!(item.quantity(), 0);
        assert_eq!(item.version(), 0);
        assert_eq!(item.to_item().name, "Test item");
    }

    #[test]
    fn register_rejects_negative_values_and_blank_names() {
        assert!(matches!(
            StockItem::register(&new_item(-1, 0)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            StockItem::register(&new_item(0, -5)),
            Err(DomainError::Validation(_))
        ));
        let mut blank = new_item(0, 0);
        blank.name = "   ".to_string();
        assert!(matches!(StockItem::register(&blank), Err(DomainError::Validation(_))));
        let mut bad_key = new_item(0, 0);
        bad_key.key = "no spaces".to_string();
        assert!(matches!(StockItem::register(&bad_key), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn outbound_beyond_stock_is_rejected_without_events() {
        let mut item = StockItem::register(&new_item(0, 0)).unwrap();
        execute(&mut item, MovementKind::Inbound, 10).unwrap();

        let err = item.handle(&record(&item, MovementKind::Outbound, 11)).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(10, 11));
        assert_eq!(item.quantity(), 10);
        assert_eq!(item.version(), 1);
    }

    #[test]
    fn adjustment_adds_and_outbound_to_exactly_zero_is_allowed() {
        let mut item = StockItem::register(&new_item(0, 0)).unwrap();
        execute(&mut item, MovementKind::Adjustment, 7).unwrap();
        execute(&mut item, MovementKind::Outbound, 7).unwrap();
        assert_eq!(item.quantity(), 0);
        assert_eq!(item.version(), 2);
    }

    #[test]
    fn oversized_magnitude_and_reason_are_validation_errors() {
        let item = StockItem::register(&new_item(0, 0)).unwrap();
        let err = item
            .handle(&record(&item, MovementKind::Inbound, u64::MAX))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let StockCommand::RecordMovement(mut cmd) = record(&item, MovementKind::Inbound, 1);
        cmd.reason = "x".repeat(MAX_REASON_LEN + 1);
        let err = item.handle(&StockCommand::RecordMovement(cmd)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn command_for_another_item_violates_invariant() {
        let item = StockItem::register(&new_item(0, 0)).unwrap();
        let StockCommand::RecordMovement(mut cmd) = record(&item, MovementKind::Inbound, 1);
        cmd.item_key = ItemKey::parse("OTHER").unwrap();
        let err = item.handle(&StockCommand::RecordMovement(cmd)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn movement_kind_parses_case_insensitively() {
        assert_eq!("Outbound".parse::<MovementKind>().unwrap(), MovementKind::Outbound);
        assert_eq!(MovementKind::Adjustment.to_string(), "adjustment");
        assert!("transfer".parse::<MovementKind>().is_err());
        assert_eq!(
            serde_json::to_string(&MovementKind::Inbound).unwrap(),
            "\"inbound\""
        );
    }

    fn kind_strategy() -> impl Strategy<Value = MovementKind> {
        prop_oneof![
            Just(MovementKind::Inbound),
            Just(MovementKind::Outbound),
            Just(MovementKind::Adjustment),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: whatever is requested, quantity never goes negative and
        /// equals the signed sum of the accepted movements.
        #[test]
        fn quantity_never_negative_and_matches_accepted_sum(
            ops in prop::collection::vec((kind_strategy(), 0u64..500), 0..60)
        ) {
            let mut item = StockItem::register(&new_item(0, 0)).unwrap();
            let mut accepted_sum: i64 = 0;

            for (kind, magnitude) in ops {
                if execute(&mut item, kind, magnitude).is_ok() {
                    accepted_sum += kind.delta(magnitude as i64);
                }
                prop_assert!(item.quantity() >= 0);
            }

            prop_assert_eq!(item.quantity(), accepted_sum);
        }
    }
}
