use crate::errors::CoreError;
use crate::models::holding::{normalize_ticker, Holding};
use crate::models::portfolio::Portfolio;

/// Manages the holdings list: add/edit by ticker, delete, price updates.
///
/// Pure business logic: no I/O and no locking.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Add a holding, or replace the one with the same ticker.
    ///
    /// A replaced holding moves to the end of the list and its last price
    /// resets to the new cost basis; the next refresh brings the market
    /// price back. Returns the stored holding.
    pub fn upsert(
        &self,
        portfolio: &mut Portfolio,
        ticker: &str,
        shares: f64,
        cost_basis: f64,
    ) -> Result<Holding, CoreError> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(CoreError::ValidationError("Ticker must not be empty".into()));
        }
        Self::validate_amount("shares", shares)?;
        Self::validate_amount("cost", cost_basis)?;

        let holding = Holding::new(&ticker, shares, cost_basis);
        portfolio.holdings.retain(|h| h.ticker != ticker);
        portfolio.holdings.push(holding.clone());
        Ok(holding)
    }

    /// [`upsert`](Self::upsert) straight from form text.
    ///
    /// Nothing changes unless all three fields are valid.
    pub fn upsert_from_input(
        &self,
        portfolio: &mut Portfolio,
        ticker: &str,
        shares: &str,
        cost_basis: &str,
    ) -> Result<Holding, CoreError> {
        let shares = Self::parse_amount("shares", shares)?;
        let cost_basis = Self::parse_amount("cost", cost_basis)?;
        self.upsert(portfolio, ticker, shares, cost_basis)
    }

    /// Remove the holding for `ticker`. Returns false if it was not held.
    pub fn remove(&self, portfolio: &mut Portfolio, ticker: &str) -> bool {
        let ticker = normalize_ticker(ticker);
        let before = portfolio.holdings.len();
        portfolio.holdings.retain(|h| h.ticker != ticker);
        portfolio.holdings.len() != before
    }

    /// Holdings in insertion/edit order.
    pub fn list<'a>(&self, portfolio: &'a Portfolio) -> &'a [Holding] {
        &portfolio.holdings
    }

    /// Record a fresh quote for `ticker`.
    ///
    /// Returns false without touching anything when the ticker is no longer
    /// held (deleted while a refresh was in flight) or the price is unusable.
    pub fn update_price(&self, portfolio: &mut Portfolio, ticker: &str, price: f64) -> bool {
        if !price.is_finite() || price < 0.0 {
            return false;
        }
        let ticker = normalize_ticker(ticker);
        match portfolio.holdings.iter_mut().find(|h| h.ticker == ticker) {
            Some(holding) => {
                holding.last_price = price;
                true
            }
            None => false,
        }
    }

    /// Parse a user-entered quantity or price.
    pub fn parse_amount(field: &str, input: &str) -> Result<f64, CoreError> {
        let value: f64 = input.trim().parse().map_err(|_| {
            CoreError::ValidationError(format!("{field} must be a number, got {input:?}"))
        })?;
        Self::validate_amount(field, value)?;
        Ok(value)
    }

    fn validate_amount(field: &str, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "{field} must be a non-negative number, got {value}"
            )));
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
