//! Collection fan-out: query every source concurrently and sort the results
//! into tracked, supplementary and market rate maps.

use std::collections::BTreeSet;

use futures::future::join_all;
use tracing::{info, warn};

use crate::infrastructure::sources::{AggregateSource, RateSource};
use crate::shared::types::{BankAliasTable, RateMap};

/// One run's worth of collected rates, already split by role.
#[derive(Debug, Clone, Default)]
pub struct CollectedRates {
    /// Tracked banks that produced a rate this run.
    pub primary: RateMap,
    /// Monitored-only banks.
    pub supplementary: RateMap,
    /// Competitor banks from aggregator listings, keyed by surface name.
    pub market: RateMap,
    /// Banks and aggregators that produced nothing this run.
    pub failures: Vec<String>,
}

pub struct ObservationCollector<'a> {
    sources: &'a [Box<dyn RateSource>],
    aggregates: &'a [Box<dyn AggregateSource>],
    aliases: &'a BankAliasTable,
    supplementary: BTreeSet<String>,
}

impl<'a> ObservationCollector<'a> {
    pub fn new(
        sources: &'a [Box<dyn RateSource>],
        aggregates: &'a [Box<dyn AggregateSource>],
        aliases: &'a BankAliasTable,
        supplementary_banks: &[String],
    ) -> Self {
        Self {
            sources,
            aggregates,
            aliases,
            supplementary: supplementary_banks.iter().cloned().collect(),
        }
    }

    /// Run a full collection pass. Per-bank failures never abort the run;
    /// they end up on the failure list instead.
    pub async fn collect(&self) -> CollectedRates {
        let mut out = CollectedRates::default();

        // Direct bank pages, all at once. Only tracked banks go on the
        // failure list; a supplementary bank without a rate is just absent.
        let fetches = self.sources.iter().map(|s| s.fetch_rate());
        for (source, result) in self.sources.iter().zip(join_all(fetches).await) {
            let bank = source.bank().to_string();
            let tracked = !self.supplementary.contains(&bank);
            match result {
                Ok(Some(rate)) => {
                    if tracked {
                        out.primary.insert(bank, rate);
                    } else {
                        out.supplementary.insert(bank, rate);
                    }
                }
                Ok(None) => {
                    if tracked {
                        out.failures.push(bank);
                    }
                }
                Err(e) => {
                    warn!("✗ {}: {}", bank, e);
                    if tracked {
                        out.failures.push(bank);
                    }
                }
            }
        }

        // Aggregator listings fill gaps and populate the market view
        let fetches = self.aggregates.iter().map(|a| a.fetch_rates());
        for (aggregate, result) in self.aggregates.iter().zip(join_all(fetches).await) {
            let listing = match result {
                Ok(listing) => listing,
                Err(e) => {
                    warn!("✗ aggregator {}: {}", aggregate.name(), e);
                    out.failures.push(aggregate.name().to_string());
                    continue;
                }
            };
            for (surface, rate) in listing {
                match self.aliases.resolve(&surface) {
                    Some(canonical) if self.supplementary.contains(canonical) => {
                        out.supplementary
                            .entry(canonical.to_string())
                            .or_insert(rate);
                    }
                    Some(canonical) => {
                        // A direct scrape beats an aggregator listing
                        out.primary.entry(canonical.to_string()).or_insert(rate);
                    }
                    None => {
                        let entry = out.market.entry(surface).or_insert(rate);
                        if rate > *entry {
                            *entry = rate;
                        }
                    }
                }
            }
        }

        // Aggregators may have recovered banks whose pages failed
        out.failures.retain(|b| !out.primary.contains_key(b));

        info!(
            "Collected {} tracked, {} supplementary, {} market rates ({} failures)",
            out.primary.len(),
            out.supplementary.len(),
            out.market.len(),
            out.failures.len()
        );
        out
    }
}
