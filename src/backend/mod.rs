//! Alert-price backend REST API client and wire types

pub mod rest;
pub mod types;

pub use rest::{BackendClient, BackendError};
pub use types::{AlertOutcome, DeleteOutcome, PriceSnapshot, TrackedStock};
