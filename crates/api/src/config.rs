//! Process configuration, read from `STOCKGUARD_*` environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use stockguard_advisor::ForecastConfig;
use stockguard_observability::LogFormat;

pub const ENV_BIND_ADDR: &str = "STOCKGUARD_BIND_ADDR";
pub const ENV_FORECAST_WINDOW: &str = "STOCKGUARD_FORECAST_WINDOW";
pub const ENV_FORECAST_BUFFER: &str = "STOCKGUARD_FORECAST_BUFFER";
pub const ENV_LOG_FORMAT: &str = "STOCKGUARD_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub forecast: ForecastConfig,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset variables take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(ENV_BIND_ADDR, e.to_string()))?;

        let mut forecast = ForecastConfig::default();
        if let Some(raw) = lookup(ENV_FORECAST_WINDOW) {
            let window = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::invalid(ENV_FORECAST_WINDOW, e.to_string()))?;
            forecast = forecast.with_window(window);
        }
        if let Some(raw) = lookup(ENV_FORECAST_BUFFER) {
            let buffer = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| ConfigError::invalid(ENV_FORECAST_BUFFER, e.to_string()))?;
            forecast = forecast.with_buffer_factor(buffer);
        }
        forecast.validate().map_err(|e| {
            let var = if forecast.window == 0 {
                ENV_FORECAST_WINDOW
            } else {
                ENV_FORECAST_BUFFER
            };
            ConfigError::invalid(var, e.to_string())
        })?;

        let log_format = match lookup(ENV_LOG_FORMAT) {
            None => LogFormat::default(),
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| {
                ConfigError::invalid(ENV_LOG_FORMAT, "expected `json` or `pretty`")
            })?,
        };

        Ok(Self {
            bind_addr,
            forecast,
            log_format,
        })
    }
}
