use serde::Deserialize;

use stockguard_inventory::MovementKind;

pub const DEFAULT_HORIZON_DAYS: u32 = 30;

#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub magnitude: u64,
    pub kind: MovementKind,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub item: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub horizon_days: Option<u32>,
}

impl ForecastQuery {
    pub fn horizon_days(&self) -> u32 {
        self.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS)
    }
}
