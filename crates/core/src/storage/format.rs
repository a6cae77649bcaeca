use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::holding::{normalize_ticker, Holding};

/// On-disk shape of one holding.
///
/// Field names are those the mobile app has always written: `cost` for
/// the cost basis and an optional `last_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredHolding {
    pub ticker: String,
    pub shares: f64,
    #[serde(rename = "cost")]
    pub cost_basis: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
}

impl From<&Holding> for StoredHolding {
    fn from(h: &Holding) -> Self {
        Self {
            ticker: h.ticker.clone(),
            shares: h.shares,
            cost_basis: h.cost_basis,
            last_price: Some(h.last_price),
        }
    }
}

impl TryFrom<StoredHolding> for Holding {
    type Error = CoreError;

    fn try_from(s: StoredHolding) -> Result<Self, Self::Error> {
        let ticker = normalize_ticker(&s.ticker);
        if ticker.is_empty() {
            return Err(CoreError::Deserialization(
                "Stored holding has an empty ticker".into(),
            ));
        }
        for (field, value) in [("shares", s.shares), ("cost", s.cost_basis)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Deserialization(format!(
                    "Stored holding {ticker} has invalid {field}: {value}"
                )));
            }
        }
        // A stored price that is unusable falls back to the cost basis.
        let last_price = s
            .last_price
            .filter(|p| p.is_finite() && *p >= 0.0)
            .unwrap_or(s.cost_basis);

        Ok(Holding {
            ticker,
            shares: s.shares,
            cost_basis: s.cost_basis,
            last_price,
        })
    }
}

/// Serialize the holdings list as a JSON array.
pub fn encode(holdings: &[Holding]) -> Result<Vec<u8>, CoreError> {
    let records: Vec<StoredHolding> = holdings.iter().map(StoredHolding::from).collect();
    serde_json::to_vec(&records)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize holdings: {e}")))
}

/// Parse a JSON array of holdings.
///
/// Duplicate tickers collapse onto the last record, at the position of
/// that last record, so the one-holding-per-ticker rule holds after restore.
pub fn decode(data: &[u8]) -> Result<Vec<Holding>, CoreError> {
    let records: Vec<StoredHolding> = serde_json::from_slice(data)
        .map_err(|e| CoreError::Deserialization(format!("Failed to parse holdings: {e}")))?;

    let mut holdings: Vec<Holding> = Vec::with_capacity(records.len());
    for record in records {
        let holding = Holding::try_from(record)?;
        holdings.retain(|h| h.ticker != holding.ticker);
        holdings.push(holding);
    }
    Ok(holdings)
}
