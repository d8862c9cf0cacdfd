//! Events exchanged between the session task and the UI task

use crate::backend::{PriceSnapshot, TrackedStock};
use crate::session::session_manager::SessionStats;

/// Events flowing from the session to the UI.
///
/// Snapshots are immutable values carried inside the events; the UI stores
/// the latest applied one whole instead of patching shared state.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A full table generation: tracked stocks plus the price snapshot they
    /// were loaded together with
    TableLoaded {
        generation: u64,
        stocks: Vec<TrackedStock>,
        snapshot: PriceSnapshot,
    },
    /// Price-only refresh; rows keep the structure of the last generation
    PricesPatched { snapshot: PriceSnapshot },
    /// History series for one ticker of a given table generation
    HistoryLoaded {
        generation: u64,
        ticker: String,
        prices: Vec<f64>,
    },
    /// The add form submission was accepted by the backend
    AddSucceeded { ticker: String },
    /// The add form submission was rejected or failed
    AddFailed { message: String },
    /// A delete request was accepted by the backend
    DeleteSucceeded { ticker: String },
    /// A delete request was rejected or failed
    DeleteFailed { message: String },
    /// Session statistics heartbeat
    StatsUpdated { stats: SessionStats },
    /// The session is shutting down; the UI should restore the terminal
    ShutdownRequested,
}

/// Commands flowing from the UI to the session
#[derive(Debug, Clone)]
pub enum UiCommand {
    /// Submit a new tracked stock
    AddStock {
        ticker: String,
        buy_price: f64,
        sell_price: f64,
    },
    /// Delete a tracked stock (the UI has already confirmed)
    DeleteStock { ticker: String },
    /// Force a full reload outside the regular cadence
    Reload,
    /// Terminate the session
    Shutdown,
}
