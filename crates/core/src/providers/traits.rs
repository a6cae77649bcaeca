use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;

/// Trait abstraction for market quote sources.
///
/// One call covers the whole ticker set. Implementations may leave out
/// tickers they cannot resolve (unknown symbol, delisted, ...), but a
/// transport or parse failure must fail the whole call: callers rely on
/// "error means nothing was learned".
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest price for each of `tickers`, keyed by the uppercased ticker.
    async fn fetch_prices(&self, tickers: &[String]) -> Result<HashMap<String, f64>, CoreError>;
}

/// Source of currency exchange rates.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FxRateProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Units of `to` per one unit of `from`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, CoreError>;
}
