use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

/// Runtime configuration for the tracker.
///
/// Every field has a default, so a partially specified JSON document or an
/// environment with only some `APEX_*` variables set still yields a usable
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency quotes are denominated in (e.g., "USD").
    pub base_currency: String,

    /// Currency the net worth headline is shown in (e.g., "THB").
    pub display_currency: String,

    /// Units of `display_currency` per one unit of `base_currency`.
    pub fx_rate: f64,

    /// Delay between two price refresh cycles, in milliseconds.
    pub refresh_interval_ms: u64,

    /// Key under which the holdings list is stored.
    pub storage_key: String,

    /// Refresh `fx_rate` from the configured fx provider on every cycle.
    pub auto_refresh_fx: bool,

    /// Seed the demo holdings when storage has never been written.
    pub seed_starter_holdings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            display_currency: "THB".to_string(),
            fx_rate: 34.50,
            refresh_interval_ms: 10_000,
            storage_key: "portfolio".to_string(),
            auto_refresh_fx: false,
            seed_starter_holdings: true,
        }
    }
}

impl Settings {
    /// Defaults overlaid with any `APEX_*` environment variables.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(v) = std::env::var("APEX_BASE_CURRENCY") {
            settings.base_currency = v.trim().to_uppercase();
        }
        if let Ok(v) = std::env::var("APEX_DISPLAY_CURRENCY") {
            settings.display_currency = v.trim().to_uppercase();
        }
        if let Some(v) = env_parse::<f64>("APEX_FX_RATE") {
            settings.fx_rate = v;
        }
        if let Some(v) = env_parse::<u64>("APEX_REFRESH_INTERVAL_MS") {
            settings.refresh_interval_ms = v;
        }
        if let Ok(v) = std::env::var("APEX_STORAGE_KEY") {
            settings.storage_key = v;
        }
        if let Some(v) = env_parse::<bool>("APEX_AUTO_REFRESH_FX") {
            settings.auto_refresh_fx = v;
        }
        if let Some(v) = env_parse::<bool>("APEX_SEED_STARTER_HOLDINGS") {
            settings.seed_starter_holdings = v;
        }

        settings
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.refresh_interval_ms == 0 {
            return Err(CoreError::ValidationError(
                "Refresh interval must be greater than zero".into(),
            ));
        }
        validate_fx_rate(self.fx_rate)?;
        if self.storage_key.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Storage key must not be empty".into(),
            ));
        }
        if self.base_currency.trim().is_empty() || self.display_currency.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Currency codes must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// An exchange rate must be a finite, strictly positive number.
pub fn validate_fx_rate(rate: f64) -> Result<(), CoreError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Exchange rate must be finite and positive, got {rate}"
        )));
    }
    Ok(())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}
