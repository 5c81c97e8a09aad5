use std::sync::Arc;

use thiserror::Error;

use stockguard_advisor::{AdvisorError, DemandForecaster, ForecastConfig, ReorderAdvisor};
use stockguard_inventory::{IntegrityVerifier, Ledger, LedgerError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
}

/// Everything the handlers need, shared behind one `Arc`.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub ledger: Arc<Ledger>,
    pub advisor: ReorderAdvisor<Arc<Ledger>>,
    pub verifier: IntegrityVerifier,
}

impl AppServices {
    pub fn new(ledger: Arc<Ledger>, forecast: ForecastConfig) -> Result<Self, StartupError> {
        let forecaster = DemandForecaster::new(forecast)?;
        Ok(Self {
            advisor: ReorderAdvisor::new(ledger.clone(), forecaster),
            verifier: IntegrityVerifier::new(ledger.clone()),
            ledger,
        })
    }

    /// Services over a ledger loaded with the default catalog.
    pub fn seeded(forecast: ForecastConfig) -> Result<Self, StartupError> {
        Self::new(Arc::new(Ledger::seeded()?), forecast)
    }
}
