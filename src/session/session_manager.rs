//! Session manager owning the refresh scheduler and backend calls

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::ui::ui_manager::UiManager;

use super::events::{SessionEvent, UiCommand};
use super::poller::{FetchOutcome, Poller};

/// Session state tracking
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Starting,
    Running,
    ShuttingDown,
    Terminated,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Spawn the terminal UI task; disabled in headless tests
    pub enable_tui: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { enable_tui: true }
    }
}

/// Session statistics for the header display
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub start_time: u64,
    pub full_refreshes: u64,
    pub price_refreshes: u64,
    pub history_loads: u64,
    pub fetch_errors: u64,
    pub commands_processed: u64,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            start_time: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            full_refreshes: 0,
            price_refreshes: 0,
            history_loads: 0,
            fetch_errors: 0,
            commands_processed: 0,
        }
    }
}

/// Main session manager: owns the scheduler, applies fetch results in
/// sequence order, and services UI commands
pub struct SessionManager {
    config: Config,
    session_config: SessionConfig,
    state: SessionState,
    stats: SessionStats,
    client: Arc<BackendClient>,
    poller: Poller,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
    command_tx: mpsc::UnboundedSender<UiCommand>,
    command_rx: mpsc::UnboundedReceiver<UiCommand>,
    ui_task: Option<tokio::task::JoinHandle<()>>,
}

impl SessionManager {
    /// Create a new SessionManager with the default session configuration
    pub fn new(config: Config) -> Result<Self> {
        Self::with_session_config(config, SessionConfig::default())
    }

    /// Create a new SessionManager with an explicit session configuration
    pub fn with_session_config(config: Config, session_config: SessionConfig) -> Result<Self> {
        info!("Creating new SessionManager");

        config.validate()?;

        let client = Arc::new(BackendClient::from_config(&config));
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let poller = Poller::new(client.clone(), outcome_tx);

        Ok(Self {
            config,
            session_config,
            state: SessionState::Starting,
            stats: SessionStats::default(),
            client,
            poller,
            outcome_rx,
            event_tx,
            event_rx: Some(event_rx),
            command_tx,
            command_rx,
            ui_task: None,
        })
    }

    /// Sender for UI commands into the session
    pub fn command_sender(&self) -> mpsc::UnboundedSender<UiCommand> {
        self.command_tx.clone()
    }

    /// Take the session event receiver; the UI task consumes it
    pub fn take_event_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.event_rx.take()
    }

    /// Current session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Initialize the session: spawn the UI task and the initial data load
    pub async fn initialize(&mut self) -> Result<()> {
        info!("Initializing session against {}", self.client.base_url());

        if self.session_config.enable_tui {
            self.initialize_ui()?;
        }

        // Initial full load at startup; the scheduled cadence starts one
        // period later
        self.poller.spawn_table_fetch();

        self.state = SessionState::Running;
        info!("Session initialized successfully");

        Ok(())
    }

    fn initialize_ui(&mut self) -> Result<()> {
        let event_rx = self
            .event_rx
            .take()
            .context("UI event receiver already taken")?;

        let ui = UiManager::new(event_rx, self.command_tx.clone(), self.config.clone());
        self.ui_task = Some(tokio::spawn(async move {
            if let Err(e) = ui.run().await {
                tracing::error!("UI task failed: {}", e);
            }
        }));

        Ok(())
    }

    /// Run the scheduler loop until shutdown
    pub async fn run(&mut self) -> Result<()> {
        let table_period = Duration::from_secs(self.config.poll.table_refresh_secs);
        let price_period = Duration::from_secs(self.config.poll.price_refresh_secs);

        let mut table_ticker =
            tokio::time::interval_at(Instant::now() + table_period, table_period);
        let mut price_ticker =
            tokio::time::interval_at(Instant::now() + price_period, price_period);
        table_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        price_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Refresh scheduler running (table {}s, prices {}s)",
            table_period.as_secs(),
            price_period.as_secs()
        );

        loop {
            tokio::select! {
                _ = table_ticker.tick() => {
                    self.poller.spawn_table_fetch();
                }
                _ = price_ticker.tick() => {
                    self.poller.spawn_price_fetch();
                }
                Some(outcome) = self.outcome_rx.recv() => {
                    self.apply_fetch(outcome);
                }
                command = self.command_rx.recv() => {
                    match command {
                        None => break,
                        Some(command) => {
                            if self.handle_command(command).await {
                                break;
                            }
                        }
                    }
                }
            }
        }

        self.state = SessionState::ShuttingDown;
        self.forward(SessionEvent::ShutdownRequested);

        if let Some(task) = self.ui_task.take() {
            let _ = task.await;
        }

        self.state = SessionState::Terminated;
        info!("Session terminated");
        Ok(())
    }

    /// Apply a completed fetch, discarding responses of superseded cycles
    fn apply_fetch(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Table { seq, result } => match result {
                Ok((stocks, snapshot)) => {
                    if !self.poller.admit_table(seq) {
                        debug!("Discarding stale table fetch (seq {})", seq);
                        return;
                    }
                    self.stats.full_refreshes += 1;
                    let tickers: Vec<String> =
                        stocks.iter().map(|s| s.ticker.clone()).collect();
                    self.forward(SessionEvent::TableLoaded {
                        generation: seq,
                        stocks,
                        snapshot,
                    });
                    self.poller.spawn_history_fetches(seq, tickers);
                    self.forward_stats();
                }
                Err(e) => self.record_poll_failure("table refresh", &e.to_string()),
            },
            FetchOutcome::Prices { seq, result } => match result {
                Ok(snapshot) => {
                    if !self.poller.admit_prices(seq) {
                        debug!("Discarding stale price fetch (seq {})", seq);
                        return;
                    }
                    self.stats.price_refreshes += 1;
                    self.forward(SessionEvent::PricesPatched { snapshot });
                    self.forward_stats();
                }
                Err(e) => self.record_poll_failure("price refresh", &e.to_string()),
            },
            FetchOutcome::History {
                generation,
                ticker,
                result,
            } => match result {
                Ok(prices) => {
                    if !self.poller.is_current_generation(generation) {
                        debug!(
                            "Discarding history for {} from superseded generation {}",
                            ticker, generation
                        );
                        return;
                    }
                    self.stats.history_loads += 1;
                    self.forward(SessionEvent::HistoryLoaded {
                        generation,
                        ticker,
                        prices,
                    });
                }
                Err(e) => {
                    // Chart is simply omitted for this row
                    warn!("Failed to load history for {}: {}", ticker, e);
                    self.stats.fetch_errors += 1;
                }
            },
        }
    }

    /// Handle a UI command; returns true when the session should shut down
    async fn handle_command(&mut self, command: UiCommand) -> bool {
        self.stats.commands_processed += 1;

        match command {
            UiCommand::AddStock {
                ticker,
                buy_price,
                sell_price,
            } => {
                self.handle_add_stock(&ticker, buy_price, sell_price).await;
                false
            }
            UiCommand::DeleteStock { ticker } => {
                self.handle_delete_stock(&ticker).await;
                false
            }
            UiCommand::Reload => {
                self.poller.spawn_table_fetch();
                false
            }
            UiCommand::Shutdown => {
                info!("Shutdown requested via UI command");
                true
            }
        }
    }

    async fn handle_add_stock(&mut self, ticker: &str, buy_price: f64, sell_price: f64) {
        match self.client.create_alert(ticker, buy_price, sell_price).await {
            Ok(outcome) if outcome.success => {
                info!("Added {} [{} - {}]", ticker, buy_price, sell_price);
                self.forward(SessionEvent::AddSucceeded {
                    ticker: ticker.to_string(),
                });
                self.poller.spawn_table_fetch();
            }
            Ok(outcome) => {
                let message = outcome
                    .error
                    .unwrap_or_else(|| "Failed to add stock".to_string());
                warn!("Backend rejected add for {}: {}", ticker, message);
                self.forward(SessionEvent::AddFailed { message });
            }
            Err(e) if e.is_not_found() => {
                // Older backend vintages only expose the JSON route
                debug!("Primary add endpoint missing, falling back to /add_stock");
                match self
                    .client
                    .create_alert_legacy(ticker, buy_price, sell_price)
                    .await
                {
                    Ok(()) => {
                        info!("Added {} via legacy endpoint", ticker);
                        self.forward(SessionEvent::AddSucceeded {
                            ticker: ticker.to_string(),
                        });
                        self.poller.spawn_table_fetch();
                    }
                    Err(e) => {
                        warn!("Legacy add for {} failed: {}", ticker, e);
                        self.forward(SessionEvent::AddFailed {
                            message: "Failed to add stock".to_string(),
                        });
                    }
                }
            }
            Err(e) => {
                warn!("Add stock request for {} failed: {}", ticker, e);
                self.forward(SessionEvent::AddFailed {
                    message: "Failed to add stock".to_string(),
                });
            }
        }
    }

    async fn handle_delete_stock(&mut self, ticker: &str) {
        match self.client.delete_alert(ticker).await {
            Ok(outcome) if outcome.success => {
                info!("Deleted {}", ticker);
                self.forward(SessionEvent::DeleteSucceeded {
                    ticker: ticker.to_string(),
                });
                self.poller.spawn_table_fetch();
            }
            Ok(_) => {
                warn!("Backend rejected delete for {}", ticker);
                self.forward(SessionEvent::DeleteFailed {
                    message: "Failed to delete stock".to_string(),
                });
            }
            Err(e) => {
                warn!("Delete request for {} failed: {}", ticker, e);
                self.forward(SessionEvent::DeleteFailed {
                    message: "Failed to delete stock".to_string(),
                });
            }
        }
    }

    fn record_poll_failure(&mut self, what: &str, error: &str) {
        // Background failures are logged only; polling continues on the
        // fixed cadence with no backoff
        warn!("Background {} failed: {}", what, error);
        self.stats.fetch_errors += 1;
        self.forward_stats();
    }

    fn forward(&self, event: SessionEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("UI event channel closed");
        }
    }

    fn forward_stats(&self) {
        self.forward(SessionEvent::StatsUpdated {
            stats: self.stats.clone(),
        });
    }
}
