//! Application layer - collection fan-out and run orchestration

pub mod collector;
pub mod tracker;

pub use collector::{CollectedRates, ObservationCollector};
pub use tracker::RateTracker;
