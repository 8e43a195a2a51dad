//! Ratewatch - HYSA rate tracker and alert bot
//!
//! Built with Domain-Driven Design principles:
//! - `domain`: trend analysis, notification policy, report formatting
//! - `infrastructure`: rate sources, persistence, alert delivery
//! - `application`: collection fan-out and run orchestration
//! - `shared`: common types, errors, configuration

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::{CollectedRates, ObservationCollector, RateTracker};
pub use domain::cycle::{run_analysis_cycle, CycleInput, CycleOutput};
pub use domain::notification::NotificationMode;
pub use shared::config::{ConfigLoader, TrackerConfig};
pub use shared::errors::AppError;
pub use shared::types::{MarketSnapshot, RateMap, RateObservation};
