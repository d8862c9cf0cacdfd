//! Wire types for the alert-price backend API

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A tracked stock with its configured buy/sell price band.
///
/// The backend echoes the bounds back exactly as they were posted, so they
/// may arrive as JSON numbers or as numeric strings. Both decode to `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedStock {
    pub ticker: String,
    #[serde(deserialize_with = "decimal_from_any")]
    pub buy_price: f64,
    #[serde(deserialize_with = "decimal_from_any")]
    pub sell_price: f64,
}

/// Current prices for all known tickers, replaced whole on every poll.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriceSnapshot {
    #[serde(default, deserialize_with = "price_map_from_any")]
    pub prices: HashMap<String, f64>,

    /// Backend-side timestamp of the last cache refresh, ISO formatted
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl PriceSnapshot {
    /// Current price for a ticker, if the backend knows one
    pub fn price(&self, ticker: &str) -> Option<f64> {
        self.prices.get(ticker).copied().filter(|p| p.is_finite())
    }

    /// Last update time formatted for the header, falling back to the raw
    /// string when the backend sends an unexpected format
    pub fn last_updated_label(&self) -> Option<String> {
        let raw = self.last_updated.as_deref()?;
        let formatted = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| raw.to_string());
        Some(formatted)
    }
}

/// Historical close prices for one ticker
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub prices: Vec<f64>,
}

/// Response of the primary add endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AlertOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of the delete endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn decimal_from_any<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

fn price_map_from_any<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let raw: Option<HashMap<String, Raw>> = Option::deserialize(deserializer)?;
    let mut prices = HashMap::new();
    for (ticker, value) in raw.unwrap_or_default() {
        let price = match value {
            Raw::Number(value) => value,
            Raw::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(serde::de::Error::custom)?,
        };
        prices.insert(ticker, price);
    }
    Ok(prices)
}
