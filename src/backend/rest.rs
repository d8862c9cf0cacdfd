//! Alert-price backend REST client implementation

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use super::types::{AlertOutcome, DeleteOutcome, HistoryResponse, PriceSnapshot, TrackedStock};
use crate::config::Config;

/// Errors surfaced by the backend client.
///
/// HTTP status failures stay distinguishable from transport and decode
/// failures so callers can branch on them (the add path falls back to the
/// legacy endpoint on 404).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl BackendError {
    /// True when the backend answered 404 for the requested route or entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Client for the alert-price REST API
pub struct BackendClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.backend.base_url.clone(),
            Duration::from_secs(config.backend.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the list of tracked stocks with their price bands
    pub async fn tracked_stocks(&self) -> Result<Vec<TrackedStock>, BackendError> {
        let stocks: Vec<TrackedStock> = self.get_json("/api/tracked-stocks").await?;
        debug!("Fetched {} tracked stocks", stocks.len());
        Ok(stocks)
    }

    /// Get the current price snapshot for all known tickers
    pub async fn prices(&self) -> Result<PriceSnapshot, BackendError> {
        let snapshot: PriceSnapshot = self.get_json("/api/prices").await?;
        debug!("Fetched prices for {} tickers", snapshot.prices.len());
        Ok(snapshot)
    }

    /// Get the historical close series for one ticker.
    ///
    /// Non-2xx responses surface as errors; the caller omits the chart.
    pub async fn history(&self, ticker: &str) -> Result<Vec<f64>, BackendError> {
        let response: HistoryResponse = self
            .get_json(&format!("/api/stock-history/{}", ticker))
            .await?;
        debug!(
            "Fetched {} history points for {}",
            response.prices.len(),
            ticker
        );
        Ok(response.prices)
    }

    /// Create a new tracked stock via the primary endpoint (multipart form,
    /// mirroring the browser form submission the backend expects)
    pub async fn create_alert(
        &self,
        ticker: &str,
        buy_price: f64,
        sell_price: f64,
    ) -> Result<AlertOutcome, BackendError> {
        let url = format!("{}/api/stock-alerts", self.base_url);
        debug!("POST {} ticker={}", url, ticker);

        let form = reqwest::multipart::Form::new()
            .text("ticker", ticker.to_string())
            .text("buy_price", buy_price.to_string())
            .text("sell_price", sell_price.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let outcome: AlertOutcome = Self::decode(response).await?;
        info!(
            "Create alert for {}: success={} error={:?}",
            ticker, outcome.success, outcome.error
        );
        Ok(outcome)
    }

    /// Create a new tracked stock via the legacy JSON endpoint.
    ///
    /// Success is signaled by the HTTP status alone; there is no body
    /// contract. Used only when the primary endpoint is absent.
    pub async fn create_alert_legacy(
        &self,
        ticker: &str,
        buy_price: f64,
        sell_price: f64,
    ) -> Result<(), BackendError> {
        let url = format!("{}/add_stock", self.base_url);
        debug!("POST {} ticker={}", url, ticker);

        let body = serde_json::json!({
            "ticker": ticker,
            "buy_price": buy_price,
            "sell_price": sell_price,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        info!("Create alert for {} via legacy endpoint", ticker);
        Ok(())
    }

    /// Delete a tracked stock by ticker
    pub async fn delete_alert(&self, ticker: &str) -> Result<DeleteOutcome, BackendError> {
        let url = format!("{}/api/stock-alerts/{}", self.base_url, ticker);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let outcome: DeleteOutcome = Self::decode(response).await?;
        info!("Delete alert for {}: success={}", ticker, outcome.success);
        Ok(outcome)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        response.json().await.map_err(BackendError::Decode)
    }
}
