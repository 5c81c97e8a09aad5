use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

/// Number of most recent outbound movements averaged by default.
pub const DEFAULT_FORECAST_WINDOW: usize = 10;

/// Default over-forecast margin applied to projected demand.
pub const DEFAULT_BUFFER_FACTOR: f64 = 1.2;

/// Forecast tuning knobs.
///
/// Both values are business heuristics, so they are configuration rather
/// than literals in the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// How many of the most recent outbound movements to average (>= 1).
    pub window: usize,
    /// Multiplier on projected demand (finite, > 0).
    pub buffer_factor: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_FORECAST_WINDOW,
            buffer_factor: DEFAULT_BUFFER_FACTOR,
        }
    }
}

impl ForecastConfig {
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_buffer_factor(mut self, buffer_factor: f64) -> Self {
        self.buffer_factor = buffer_factor;
        self
    }

    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.window == 0 {
            return Err(AdvisorError::InvalidConfig(
                "window must be >= 1".to_string(),
            ));
        }
        if !(self.buffer_factor.is_finite() && self.buffer_factor > 0.0) {
            return Err(AdvisorError::InvalidConfig(
                "buffer_factor must be a finite positive number".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ForecastConfig::default();
        assert_eq!(cfg.window, 10);
        assert_eq!(cfg.buffer_factor, 1.2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_window_and_bad_buffer() {
        assert!(ForecastConfig::default().with_window(0).validate().is_err());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                ForecastConfig::default().with_buffer_factor(bad).validate().is_err(),
                "buffer {bad} should be rejected"
            );
        }
    }
}
