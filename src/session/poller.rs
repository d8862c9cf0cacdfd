//! Fetch scheduling with per-kind sequence numbers.
//!
//! Every fetch is stamped when it is spawned; a response whose stamp is
//! older than the last applied one for its kind belongs to a superseded
//! cycle and is discarded instead of applied last-write-wins. History
//! fetches are tagged with the table generation they were issued for.

use std::sync::Arc;

use futures_util::{StreamExt, stream::FuturesUnordered};
use tokio::sync::mpsc;
use tracing::debug;

use crate::backend::{BackendClient, BackendError, PriceSnapshot, TrackedStock};

/// Completion of one spawned fetch
#[derive(Debug)]
pub enum FetchOutcome {
    Table {
        seq: u64,
        result: Result<(Vec<TrackedStock>, PriceSnapshot), BackendError>,
    },
    Prices {
        seq: u64,
        result: Result<PriceSnapshot, BackendError>,
    },
    History {
        generation: u64,
        ticker: String,
        result: Result<Vec<f64>, BackendError>,
    },
}

/// Spawns fetches and tracks which responses are still current
pub struct Poller {
    client: Arc<BackendClient>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    table_seq: u64,
    price_seq: u64,
    applied_table_seq: u64,
    applied_price_seq: u64,
}

impl Poller {
    pub fn new(client: Arc<BackendClient>, outcome_tx: mpsc::UnboundedSender<FetchOutcome>) -> Self {
        Self {
            client,
            outcome_tx,
            table_seq: 0,
            price_seq: 0,
            applied_table_seq: 0,
            applied_price_seq: 0,
        }
    }

    /// Spawn a full reload: tracked list and prices fetched in parallel
    pub fn spawn_table_fetch(&mut self) -> u64 {
        self.table_seq += 1;
        let seq = self.table_seq;
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();

        debug!("Spawning table fetch (seq {})", seq);
        tokio::spawn(async move {
            let result = async {
                let (stocks, snapshot) =
                    tokio::try_join!(client.tracked_stocks(), client.prices())?;
                Ok((stocks, snapshot))
            }
            .await;
            let _ = tx.send(FetchOutcome::Table { seq, result });
        });

        seq
    }

    /// Spawn a price-only refresh
    pub fn spawn_price_fetch(&mut self) -> u64 {
        self.price_seq += 1;
        let seq = self.price_seq;
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();

        debug!("Spawning price fetch (seq {})", seq);
        tokio::spawn(async move {
            let result = client.prices().await;
            let _ = tx.send(FetchOutcome::Prices { seq, result });
        });

        seq
    }

    /// Fan out per-ticker history fetches for one table generation
    pub fn spawn_history_fetches(&self, generation: u64, tickers: Vec<String>) {
        if tickers.is_empty() {
            return;
        }

        let client = self.client.clone();
        let tx = self.outcome_tx.clone();

        debug!(
            "Spawning {} history fetches for generation {}",
            tickers.len(),
            generation
        );
        tokio::spawn(async move {
            let mut fetches = FuturesUnordered::new();
            for ticker in tickers {
                let client = client.clone();
                fetches.push(async move {
                    let result = client.history(&ticker).await;
                    (ticker, result)
                });
            }

            while let Some((ticker, result)) = fetches.next().await {
                if tx
                    .send(FetchOutcome::History {
                        generation,
                        ticker,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });
    }

    /// Admit a table response; false means a newer one already applied
    pub fn admit_table(&mut self, seq: u64) -> bool {
        if seq <= self.applied_table_seq {
            return false;
        }
        self.applied_table_seq = seq;
        true
    }

    /// Admit a price response; false means a newer one already applied
    pub fn admit_prices(&mut self, seq: u64) -> bool {
        if seq <= self.applied_price_seq {
            return false;
        }
        self.applied_price_seq = seq;
        true
    }

    /// Whether a history response still belongs to the rendered generation
    pub fn is_current_generation(&self, generation: u64) -> bool {
        generation == self.applied_table_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn poller() -> (Poller, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Arc::new(BackendClient::new(
            "http://127.0.0.1:1",
            Duration::from_secs(1),
        ));
        (Poller::new(client, tx), rx)
    }

    #[test]
    fn test_stale_table_response_rejected() {
        let (mut poller, _rx) = poller();

        assert!(poller.admit_table(2));
        assert!(!poller.admit_table(1));
        assert!(!poller.admit_table(2));
        assert!(poller.admit_table(3));
    }

    #[test]
    fn test_price_sequencing_is_independent_of_table() {
        let (mut poller, _rx) = poller();

        assert!(poller.admit_table(5));
        assert!(poller.admit_prices(1));
        assert!(!poller.admit_prices(1));
        assert!(poller.admit_prices(2));
    }

    #[test]
    fn test_history_valid_only_for_current_generation() {
        let (mut poller, _rx) = poller();

        poller.admit_table(1);
        assert!(poller.is_current_generation(1));

        poller.admit_table(2);
        assert!(!poller.is_current_generation(1));
        assert!(poller.is_current_generation(2));
    }
}
