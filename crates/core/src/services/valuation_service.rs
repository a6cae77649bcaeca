use chrono::Utc;

use crate::models::holding::Holding;
use crate::models::valuation::{HoldingValuation, ValuationSnapshot};

/// Turns the holdings list into a [`ValuationSnapshot`].
///
/// Pure arithmetic over the last known prices. No I/O, no price lookups.
pub struct ValuationService {
    base_currency: String,
    display_currency: String,
}

impl ValuationService {
    pub fn new(base_currency: impl Into<String>, display_currency: impl Into<String>) -> Self {
        Self {
            base_currency: base_currency.into().to_uppercase(),
            display_currency: display_currency.into().to_uppercase(),
        }
    }

    /// Value every holding at its last price and total them up.
    ///
    /// `fx_rate` converts the total market value into the display currency.
    pub fn compute_snapshot(&self, holdings: &[Holding], fx_rate: f64) -> ValuationSnapshot {
        let rows: Vec<HoldingValuation> = holdings.iter().map(Self::value_holding).collect();

        let total_market_value: f64 = rows.iter().map(|r| r.market_value).sum();
        let total_cost_value: f64 = rows.iter().map(|r| r.cost_value).sum();
        let total_profit = total_market_value - total_cost_value;

        ValuationSnapshot {
            computed_at: Utc::now(),
            base_currency: self.base_currency.clone(),
            display_currency: self.display_currency.clone(),
            fx_rate,
            total_market_value,
            total_cost_value,
            total_profit,
            total_profit_pct: profit_pct(total_profit, total_cost_value),
            display_value: total_market_value * fx_rate,
            holdings: rows,
        }
    }

    fn value_holding(holding: &Holding) -> HoldingValuation {
        let market_value = holding.market_value();
        let cost_value = holding.cost_value();
        let profit = market_value - cost_value;

        HoldingValuation {
            ticker: holding.ticker.clone(),
            shares: holding.shares,
            cost_basis: holding.cost_basis,
            last_price: holding.last_price,
            market_value,
            cost_value,
            profit,
            profit_pct: profit_pct(profit, cost_value),
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new("USD", "THB")
    }
}

/// `profit / cost * 100`; zero cost (free shares, zero quantity) reports 0%.
pub fn profit_pct(profit: f64, cost_value: f64) -> f64 {
    if cost_value > 0.0 {
        profit / cost_value * 100.0
    } else {
        0.0
    }
}
