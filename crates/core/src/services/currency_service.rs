use parking_lot::RwLock;

use crate::errors::CoreError;
use crate::models::settings::validate_fx_rate;
use crate::providers::traits::FxRateProvider;

/// Holds the base → display exchange rate used for the display total.
///
/// The rate starts at the configured value. It changes only when the host
/// pushes a new one or a refresh against the fx provider succeeds; a failed
/// refresh keeps the previous rate.
pub struct CurrencyService {
    base_currency: String,
    display_currency: String,
    rate: RwLock<f64>,
    provider: Option<Box<dyn FxRateProvider>>,
}

impl CurrencyService {
    pub fn new(
        base_currency: impl Into<String>,
        display_currency: impl Into<String>,
        rate: f64,
    ) -> Result<Self, CoreError> {
        validate_fx_rate(rate)?;
        Ok(Self {
            base_currency: base_currency.into().to_uppercase(),
            display_currency: display_currency.into().to_uppercase(),
            rate: RwLock::new(rate),
            provider: None,
        })
    }

    /// Attach a provider used by [`refresh`](Self::refresh).
    pub fn with_provider(mut self, provider: Box<dyn FxRateProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn display_currency(&self) -> &str {
        &self.display_currency
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn rate(&self) -> f64 {
        *self.rate.read()
    }

    pub fn set_rate(&self, rate: f64) -> Result<(), CoreError> {
        validate_fx_rate(rate)?;
        *self.rate.write() = rate;
        Ok(())
    }

    /// Fetch the current rate from the provider and store it.
    pub async fn refresh(&self) -> Result<f64, CoreError> {
        let provider = self.provider.as_ref().ok_or(CoreError::NoProvider)?;
        let rate = provider
            .get_rate(&self.base_currency, &self.display_currency)
            .await?;
        if let Err(e) = validate_fx_rate(rate) {
            return Err(CoreError::Api {
                provider: provider.name().to_string(),
                message: e.to_string(),
            });
        }
        self.set_rate(rate)?;
        Ok(rate)
    }
}
