//! Change analysis: trend/consistency reporting and notable market mentions

pub mod trend;
pub mod notable;

pub use trend::{compute_trend_report, TrendReport, DEFAULT_WINDOW};
pub use notable::{compute_notable_mentions, MentionKind, NotableMention};
