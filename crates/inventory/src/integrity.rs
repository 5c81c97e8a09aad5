//! Movement-log replay verification.
//!
//! The verifier is a read-only diagnostic: it replays an item's movements from
//! a zero baseline through the aggregate's own `apply` and compares the result
//! with the live quantity. Drift is reported, never corrected.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use stockguard_core::{Aggregate, ItemKey};

use crate::error::LedgerError;
use crate::item::StockEvent;
use crate::ledger::Ledger;

/// Tolerated `|live - replayed|`. Quantities are integers, so none.
pub const QUANTITY_EPSILON: i64 = 0;

/// Result of replaying one item's movement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub item_key: ItemKey,
    pub is_valid: bool,
    pub live_quantity: i64,
    pub replayed_quantity: i64,
    /// `live_quantity - replayed_quantity`.
    pub difference: i64,
    pub movements_replayed: usize,
}

impl IntegrityReport {
    pub fn drift(&self) -> Option<IntegrityDrift> {
        if self.is_valid {
            return None;
        }
        Some(IntegrityDrift {
            item_key: self.item_key.clone(),
            live_quantity: self.live_quantity,
            replayed_quantity: self.replayed_quantity,
            difference: self.difference,
        })
    }
}

/// Mismatch between live quantity and replayed history (a defect signal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityDrift {
    pub item_key: ItemKey,
    pub live_quantity: i64,
    pub replayed_quantity: i64,
    pub difference: i64,
}

impl core::fmt::Display for IntegrityDrift {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "item {} drifted: live {} vs replayed {} (difference {})",
            self.item_key, self.live_quantity, self.replayed_quantity, self.difference
        )
    }
}

#[derive(Debug, Clone)]
pub struct IntegrityVerifier {
    ledger: Arc<Ledger>,
}

impl IntegrityVerifier {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    pub fn verify(&self, item_key: &ItemKey) -> Result<IntegrityReport, LedgerError> {
        let report = self.ledger.with_slot(item_key, |live, movements| {
            let mut replica = live.replica();
            for movement in movements {
                replica.apply(&StockEvent::from(movement));
            }

            let live_quantity = live.quantity();
            let replayed_quantity = replica.quantity();
            let difference = live_quantity - replayed_quantity;

            IntegrityReport {
                item_key: item_key.clone(),
                is_valid: difference.abs() <= QUANTITY_EPSILON,
                live_quantity,
                replayed_quantity,
                difference,
                movements_replayed: movements.len(),
            }
        })?;

        if let Some(drift) = report.drift() {
            warn!(
                item = %drift.item_key,
                live = drift.live_quantity,
                replayed = drift.replayed_quantity,
                difference = drift.difference,
                "integrity drift detected"
            );
        }

        Ok(report)
    }

    /// Verify every item, in catalog order.
    pub fn verify_all(&self) -> Result<Vec<IntegrityReport>, LedgerError> {
        self.ledger
            .list_items()?
            .iter()
            .map(|item| self.verify(&item.key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{MovementKind, NewItem};
    use proptest::prelude::*;

    fn key(raw: &str) -> ItemKey {
        ItemKey::parse(raw).unwrap()
    }

    fn ledger(opening: i64) -> Arc<Ledger> {
        Arc::new(
            Ledger::new(vec![NewItem {
                key: "A".to_string(),
                name: "Widget".to_string(),
                sku: "W-1".to_string(),
                opening_quantity: opening,
                safety_threshold: 5,
                lead_time_days: 3,
                unit_price: 250,
            }])
            .unwrap(),
        )
    }

    #[test]
    fn fresh_item_verifies_against_opening_balance() {
        let verifier = IntegrityVerifier::new(ledger(40));
        let report = verifier.verify(&key("A")).unwrap();

        assert!(report.is_valid);
        assert_eq!(report.live_quantity, 40);
        assert_eq!(report.replayed_quantity, 40);
        assert_eq!(report.difference, 0);
        assert_eq!(report.movements_replayed, 1);
        assert!(report.drift().is_none());
    }

    #[test]
    fn drift_is_reported_not_healed() {
        let ledger = ledger(40);
        ledger.overwrite_quantity(&key("A"), 37);
        let verifier = IntegrityVerifier::new(ledger.clone());

        let report = verifier.verify(&key("A")).unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.difference, -3);

        let drift = report.drift().unwrap();
        assert_eq!(drift.replayed_quantity, 40);
        assert!(drift.to_string().contains("difference -3"));

        // Still drifted: the verifier never writes.
        assert_eq!(ledger.get_item(&key("A")).unwrap().quantity, 37);
    }

    #[test]
    fn unknown_item_is_not_found() {
        let verifier = IntegrityVerifier::new(ledger(0));
        assert_eq!(
            verifier.verify(&key("Z")).unwrap_err(),
            LedgerError::NotFound(key("Z"))
        );
    }

    #[test]
    fn verify_all_covers_catalog() {
        let ledger = Arc::new(Ledger::seeded().unwrap());
        let verifier = IntegrityVerifier::new(ledger.clone());
        let reports = verifier.verify_all().unwrap();
        assert_eq!(reports.len(), ledger.list_items().unwrap().len());
        assert!(reports.iter().all(|r| r.is_valid));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: any sequence of requests leaves the log consistent with
        /// the live quantity.
        #[test]
        fn replay_matches_live_after_any_sequence(
            ops in prop::collection::vec((0u8..3, 0u64..100), 0..60)
        ) {
            let ledger = ledger(25);
            for (k, magnitude) in ops {
                let kind = match k {
                    0 => MovementKind::Inbound,
                    1 => MovementKind::Outbound,
                    _ => MovementKind::Adjustment,
                };
                let _ = ledger.apply_movement(&key("A"), magnitude, kind, "prop");
            }

            let report = IntegrityVerifier::new(ledger).verify(&key("A")).unwrap();
            prop_assert!(report.is_valid);
            prop_assert_eq!(report.difference, 0);
        }
    }
}
