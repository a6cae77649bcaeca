use serde::{Deserialize, Serialize};

/// What a single price refresh cycle did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    /// Tickers that were held when the cycle started
    pub requested: Vec<String>,

    /// Tickers whose `last_price` was overwritten with a fresh quote
    pub updated: Vec<String>,

    /// Tickers the quote source did not resolve; their price is unchanged
    pub missing: Vec<String>,
}

impl RefreshOutcome {
    /// True when there was nothing to refresh.
    pub fn is_empty(&self) -> bool {
        self.requested.is_empty()
    }
}
