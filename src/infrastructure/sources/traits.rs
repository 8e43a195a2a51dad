use async_trait::async_trait;

use crate::shared::errors::SourceError;
use crate::shared::types::RateMap;

/// Contract for a single-bank rate extractor.
///
/// `Ok(None)` means the page was fetched but no plausible rate was found;
/// both that and `Err` leave the bank out of the run and on the failure list.
/// Neither is ever fatal.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Canonical identifier of the bank this source covers.
    fn bank(&self) -> &str;

    /// Fetch the currently published APY, if one can be extracted.
    async fn fetch_rate(&self) -> Result<Option<f64>, SourceError>;
}

/// Contract for an aggregator site listing many banks' rates at once.
///
/// Returns raw surface names; alias resolution and the tracked/market split
/// happen in the collector.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_rates(&self) -> Result<RateMap, SourceError>;
}
