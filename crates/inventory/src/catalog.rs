//! Fixed initial catalog loaded by [`crate::Ledger::seeded`].

use crate::item::NewItem;

/// The built-in catalog: keys `ITEM-001`..`ITEM-004`.
pub fn default_catalog() -> Vec<NewItem> {
    vec![
        entry("ITEM-001", "Laptop Pro 15", "LAP-PRO-15", 50, 10, 14, 129_999),
        entry("ITEM-002", "Wireless Mouse", "WM-200", 500, 100, 7, 2_499),
        entry("ITEM-003", "USB-C Dock", "DOCK-C-4", 120, 30, 21, 8_999),
        entry("ITEM-004", "27in 4K Monitor", "MON-27-4K", 1_000, 200, 10, 34_999),
    ]
}

fn entry(
    key: &str,
    name: &str,
    sku: &str,
    opening_quantity: i64,
    safety_threshold: i64,
    lead_time_days: u32,
    unit_price: u64,
) -> NewItem {
    NewItem {
        key: key.to_string(),
        name: name.to_string(),
        sku: sku.to_string(),
        opening_quantity,
        safety_threshold,
        lead_time_days,
        unit_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::StockItem;

    #[test]
    fn default_catalog_entries_are_valid_and_unique() {
        let catalog = default_catalog();
        for entry in &catalog {
            StockItem::register(entry).unwrap();
        }
        let mut keys: Vec<&str> = catalog.iter().map(|e| e.key.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), catalog.len());
    }
}
