use std::collections::{HashMap, HashSet};

use crate::errors::CoreError;
use crate::providers::registry::QuoteProviderRegistry;

/// Fetches latest prices for a batch of tickers, with provider fallback.
///
/// Providers are tried in registration order; the first one that answers
/// wins. The answer is cleaned before it is returned: keys are uppercased,
/// tickers nobody asked for are dropped, and so are prices that are not
/// finite or are negative. A dropped ticker is reported the same way as
/// one the provider could not resolve, by its absence.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of the configured providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Latest prices for `tickers`. Fails only if every provider failed.
    pub async fn fetch_prices(
        &self,
        tickers: &[String],
    ) -> Result<HashMap<String, f64>, CoreError> {
        if tickers.is_empty() {
            return Ok(HashMap::new());
        }

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let wanted: HashSet<String> = tickers.iter().map(|t| t.to_uppercase()).collect();
        let mut last_error = None;

        for provider in &providers {
            match provider.fetch_prices(tickers).await {
                Ok(raw) => {
                    let mut prices = HashMap::with_capacity(raw.len());
                    for (ticker, price) in raw {
                        let ticker = ticker.to_uppercase();
                        if !wanted.contains(&ticker) {
                            continue;
                        }
                        if !price.is_finite() || price < 0.0 {
                            tracing::warn!(
                                "{} returned invalid price for {ticker}: {price}",
                                provider.name()
                            );
                            continue;
                        }
                        prices.insert(ticker, price);
                    }
                    return Ok(prices);
                }
                Err(e) => {
                    tracing::warn!("Quote provider {} failed: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }
}
