//! `stockguard-advisor`
//!
//! **Responsibility:** read-side demand forecasting and reorder advice.
//!
//! This crate never mutates ledger state; it only reads item snapshots through
//! [`StockReader`] and derives recommendations from the movement history.

pub mod config;
pub mod error;
pub mod forecast;
pub mod reader;
pub mod reorder;

pub use config::{DEFAULT_BUFFER_FACTOR, DEFAULT_FORECAST_WINDOW, ForecastConfig};
pub use error::AdvisorError;
pub use forecast::DemandForecaster;
pub use reader::StockReader;
pub use reorder::{ReorderAdvisor, ReorderRecommendation};
