use stockguard_inventory::{Movement, MovementKind};

use crate::config::ForecastConfig;
use crate::error::AdvisorError;

/// Products within this many ULPs of an integer are treated as that integer
/// before rounding up, so `10.0 * 1.1` forecasts 11 rather than 12.
const CEIL_TOLERANCE_ULPS: f64 = 8.0;

/// Deterministic demand forecaster.
///
/// Model:
/// - take up to `window` of the most recent outbound movements
/// - average their magnitudes (units per movement)
/// - project `ceil(average * horizon_days * buffer_factor)`
#[derive(Debug, Clone, Copy)]
pub struct DemandForecaster {
    config: ForecastConfig,
}

impl DemandForecaster {
    pub fn new(config: ForecastConfig) -> Result<Self, AdvisorError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast demand over `horizon_days` from a history in acceptance order.
    ///
    /// Returns 0 when there is no outbound history.
    pub fn forecast(&self, history: &[Movement], horizon_days: u32) -> i64 {
        let recent: Vec<u64> = history
            .iter()
            .rev()
            .filter(|m| m.kind == MovementKind::Outbound)
            .take(self.config.window)
            .map(|m| m.magnitude)
            .collect();

        if recent.is_empty() {
            return 0;
        }

        let average = recent.iter().map(|&m| m as f64).sum::<f64>() / recent.len() as f64;
        let projected = average * f64::from(horizon_days) * self.config.buffer_factor;

        // `as` saturates for out-of-range floats.
        ceil_tolerant(projected) as i64
    }
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self {
            config: ForecastConfig::default(),
        }
    }
}

fn ceil_tolerant(x: f64) -> f64 {
    let nearest = x.round();
    let tolerance = CEIL_TOLERANCE_ULPS * f64::EPSILON * nearest.abs().max(1.0);
    if (x - nearest).abs() <= tolerance {
        nearest
    } else {
        x.ceil()
    }
}
