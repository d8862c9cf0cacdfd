//! Pure market domain logic: band math, ticker suggestions, sparklines

pub mod band;
pub mod sparkline;
pub mod suggest;

pub use band::{BandStatus, Deviation, DeviationKind, band_status, deviation};
pub use sparkline::Polyline;
pub use suggest::{SuggestionEntry, filter_suggestions};
