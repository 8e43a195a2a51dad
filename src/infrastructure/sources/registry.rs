//! Source registry: builds every configured source up front so a bad
//! pattern fails the run at startup instead of mid-collection.

use tracing::info;

use crate::shared::config::TrackerConfig;
use crate::shared::errors::AppError;

use super::aggregator::ListingPageSource;
use super::page::MarketingPageSource;
use super::traits::{AggregateSource, RateSource};

pub struct SourceRegistry {
    sources: Vec<Box<dyn RateSource>>,
    aggregates: Vec<Box<dyn AggregateSource>>,
}

impl SourceRegistry {
    pub fn from_config(config: &TrackerConfig) -> Result<Self, AppError> {
        let mut sources: Vec<Box<dyn RateSource>> = Vec::with_capacity(config.banks.len());
        for bank in &config.banks {
            let source = MarketingPageSource::new(
                bank.name.clone(),
                bank.url.clone(),
                bank.pattern.as_deref(),
                bank.marker.clone(),
            )?;
            sources.push(Box::new(source));
        }

        let mut aggregates: Vec<Box<dyn AggregateSource>> =
            Vec::with_capacity(config.aggregators.len());
        for agg in &config.aggregators {
            let source =
                ListingPageSource::new(agg.name.clone(), agg.url.clone(), &agg.entry_pattern)?;
            aggregates.push(Box::new(source));
        }

        info!(
            "Registered {} bank sources and {} aggregators",
            sources.len(),
            aggregates.len()
        );
        Ok(Self {
            sources,
            aggregates,
        })
    }

    pub fn sources(&self) -> &[Box<dyn RateSource>] {
        &self.sources
    }

    pub fn aggregates(&self) -> &[Box<dyn AggregateSource>] {
        &self.aggregates
    }

    pub fn get(&self, bank: &str) -> Option<&dyn RateSource> {
        self.sources
            .iter()
            .find(|s| s.bank() == bank)
            .map(|s| s.as_ref())
    }
}
