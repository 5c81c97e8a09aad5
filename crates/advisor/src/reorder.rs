use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockguard_core::ItemKey;
use stockguard_inventory::ItemSnapshot;

use crate::error::AdvisorError;
use crate::forecast::DemandForecaster;
use crate::reader::StockReader;

/// Reorder advice for one item (an insight; nothing is ordered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    pub item_key: ItemKey,
    pub should_order: bool,
    /// `required - current_quantity` when ordering, otherwise 0.
    pub recommended_quantity: i64,
    pub reason: String,
    pub current_quantity: i64,
    /// Forecast demand over the item's lead time.
    pub forecast: i64,
    /// `forecast + safety_threshold`.
    pub required: i64,
}

/// Forecasting + reorder advice over a [`StockReader`].
#[derive(Debug, Clone)]
pub struct ReorderAdvisor<R> {
    reader: R,
    forecaster: DemandForecaster,
}

impl<R> ReorderAdvisor<R>
where
    R: StockReader,
{
    pub fn new(reader: R, forecaster: DemandForecaster) -> Self {
        Self { reader, forecaster }
    }

    /// Forecast demand for one item over `horizon_days`.
    pub fn forecast_demand(&self, item_key: &ItemKey, horizon_days: u32) -> Result<i64, AdvisorError> {
        let snapshot = self.reader.snapshot(item_key)?;
        Ok(self.forecaster.forecast(&snapshot.movements, horizon_days))
    }

    /// Decide whether an item needs replenishment before its lead time runs out.
    pub fn recommend_reorder(&self, item_key: &ItemKey) -> Result<ReorderRecommendation, AdvisorError> {
        let snapshot = self.reader.snapshot(item_key)?;
        Ok(self.recommend_from(&snapshot))
    }

    /// Recommendations for every catalog item, in catalog order.
    pub fn recommend_all(&self) -> Result<Vec<ReorderRecommendation>, AdvisorError> {
        self.reader
            .item_keys()?
            .iter()
            .map(|key| self.recommend_reorder(key))
            .collect()
    }

    fn recommend_from(&self, snapshot: &ItemSnapshot) -> ReorderRecommendation {
        let item = &snapshot.item;
        let forecast = self
            .forecaster
            .forecast(&snapshot.movements, item.lead_time_days);
        let required = forecast.saturating_add(item.safety_threshold);
        let current = item.quantity;

        let recommendation = if current < required {
            let recommended_quantity = required - current;
            ReorderRecommendation {
                item_key: item.key.clone(),
                should_order: true,
                recommended_quantity,
                reason: format!(
                    "stock {current} is below required {required} ({forecast} forecast over {} day lead time + {} safety threshold); order {recommended_quantity}",
                    item.lead_time_days, item.safety_threshold
                ),
                current_quantity: current,
                forecast,
                required,
            }
        } else {
            ReorderRecommendation {
                item_key: item.key.clone(),
                should_order: false,
                recommended_quantity: 0,
                reason: format!("stock {current} covers required {required}; no action"),
                current_quantity: current,
                forecast,
                required,
            }
        };

        if recommendation.should_order {
            info!(
                item = %item.key,
                current,
                required,
                recommended = recommendation.recommended_quantity,
                "reorder recommended"
            );
        } else {
            debug!(item = %item.key, current, required, "no reorder needed");
        }

        recommendation
    }
}
