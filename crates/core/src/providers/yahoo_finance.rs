use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;
use super::traits::QuoteProvider;

/// Yahoo Finance quote provider.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities and ETFs (`VOO`), SET-listed shares
///   (`PTT.BK`), crypto pairs (`BTC-USD`).
/// - **Price**: close of the most recent 1-minute bar of the current day.
///
/// Yahoo has no batch endpoint in `yahoo_finance_api`, so a batch is one
/// request per ticker. A ticker Yahoo cannot resolve is left out of the
/// result. When no ticker at all could be fetched the batch is treated as
/// a transport failure and the last error is returned.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }

    async fn latest_close(&self, ticker: &str) -> Result<f64, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(ticker, "1m")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch latest quote for {ticker}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {ticker}: {e}"),
        })?;

        Ok(quote.close)
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch_prices(&self, tickers: &[String]) -> Result<HashMap<String, f64>, CoreError> {
        let mut prices = HashMap::with_capacity(tickers.len());
        let mut last_error = None;

        for ticker in tickers {
            match self.latest_close(ticker).await {
                Ok(price) => {
                    prices.insert(ticker.to_uppercase(), price);
                }
                Err(e) => {
                    tracing::debug!("Yahoo Finance skipped {ticker}: {e}");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if prices.is_empty() => Err(e),
            _ => Ok(prices),
        }
    }
}
