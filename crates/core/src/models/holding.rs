use serde::{Deserialize, Serialize};

/// One portfolio line item: a ticker, how many shares are held, the
/// average cost per share, and the last price observed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, trimmed and uppercased (e.g., "VOO", "PTT.BK", "BTC-USD")
    pub ticker: String,

    /// Number of shares held (may be fractional)
    pub shares: f64,

    /// Average purchase price per share, in the quote currency
    pub cost_basis: f64,

    /// Last known market price. Starts at `cost_basis` until a quote arrives.
    pub last_price: f64,
}

impl Holding {
    /// Create a holding whose last price is its cost basis.
    pub fn new(ticker: impl AsRef<str>, shares: f64, cost_basis: f64) -> Self {
        Self {
            ticker: normalize_ticker(ticker.as_ref()),
            shares,
            cost_basis,
            last_price: cost_basis,
        }
    }

    /// Same as [`Holding::new`] but with a previously observed price.
    pub fn with_last_price(
        ticker: impl AsRef<str>,
        shares: f64,
        cost_basis: f64,
        last_price: f64,
    ) -> Self {
        Self {
            last_price,
            ..Self::new(ticker, shares, cost_basis)
        }
    }

    /// `last_price * shares`
    pub fn market_value(&self) -> f64 {
        self.last_price * self.shares
    }

    /// `cost_basis * shares`
    pub fn cost_value(&self) -> f64 {
        self.cost_basis * self.shares
    }
}

/// Canonical form of a ticker: surrounding whitespace removed, uppercased.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}
