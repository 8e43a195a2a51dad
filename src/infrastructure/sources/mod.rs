//! Rate sources: per-bank marketing pages and aggregator listings

pub mod traits;
pub mod page;
pub mod aggregator;
pub mod registry;

pub use traits::{AggregateSource, RateSource};
pub use page::MarketingPageSource;
pub use aggregator::ListingPageSource;
pub use registry::SourceRegistry;
