use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Valuation of the whole portfolio at the moment it was computed.
///
/// Derived from the holdings and an exchange rate; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationSnapshot {
    /// When this snapshot was computed
    pub computed_at: DateTime<Utc>,

    /// Currency of all per-holding and `total_*` values
    pub base_currency: String,

    /// Currency of `display_value`
    pub display_currency: String,

    /// Rate used to convert `total_market_value` into `display_value`
    pub fx_rate: f64,

    /// Sum of every holding's market value
    pub total_market_value: f64,

    /// Sum of every holding's cost value
    pub total_cost_value: f64,

    /// `total_market_value - total_cost_value`
    pub total_profit: f64,

    /// `total_profit / total_cost_value * 100`, or 0 when nothing was paid
    pub total_profit_pct: f64,

    /// `total_market_value * fx_rate`
    pub display_value: f64,

    /// Per-holding breakdown, in portfolio order
    pub holdings: Vec<HoldingValuation>,
}

impl ValuationSnapshot {
    pub fn is_gain(&self) -> bool {
        self.total_profit_pct >= 0.0
    }
}

/// Valuation of a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub ticker: String,
    pub shares: f64,
    pub cost_basis: f64,
    pub last_price: f64,

    /// `last_price * shares`
    pub market_value: f64,

    /// `cost_basis * shares`
    pub cost_value: f64,

    /// `market_value - cost_value`
    pub profit: f64,

    /// `profit / cost_value * 100`, or 0 when `cost_value` is 0
    pub profit_pct: f64,
}

impl HoldingValuation {
    /// Break-even counts as a gain, matching how the dashboard colours it.
    pub fn is_gain(&self) -> bool {
        self.profit_pct >= 0.0
    }
}
