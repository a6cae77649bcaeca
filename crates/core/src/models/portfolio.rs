use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// The in-memory holdings list. Order is insertion/edit order: an edited
/// holding moves to the end, exactly like a freshly added one.
///
/// At most one holding per ticker. All mutation goes through
/// `PortfolioService`, which keeps that invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_holdings(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    /// Demo portfolio shown on first launch, before the user adds anything.
    pub fn starter() -> Self {
        Self {
            holdings: vec![
                Holding::new("VOO", 5.12, 400.00),
                Holding::new("NVDA", 10.0, 120.50),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Tickers currently held, in portfolio order.
    pub fn tickers(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.ticker.clone()).collect()
    }

    pub fn get(&self, ticker: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.ticker == ticker)
    }
}
