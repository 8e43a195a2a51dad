//! Common types used across the application

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Bank identifier (or surface name) -> APY percentage.
///
/// BTreeMap keeps iteration order deterministic, so every tie-break in the
/// analysis layer resolves to the lexicographically first bank.
pub type RateMap = BTreeMap<String, f64>;

/// Published savings APYs live in a narrow band; anything outside it is a
/// scraping artifact and must never enter a rate mapping.
pub const MIN_PLAUSIBLE_APY: f64 = 0.1;
pub const MAX_PLAUSIBLE_APY: f64 = 10.0;

pub fn is_plausible_rate(rate: f64) -> bool {
    (MIN_PLAUSIBLE_APY..=MAX_PLAUSIBLE_APY).contains(&rate)
}

/// One completed collection run over the tracked banks.
///
/// Immutable once appended to history; insertion order = chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub timestamp: DateTime<Local>,
    pub rates: RateMap,
}

/// One run's view of the broader market: competitor banks discovered via
/// aggregator sources, excluding banks already resolved as tracked this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub timestamp: DateTime<Local>,
    pub banks: RateMap,
}

/// Static mapping from a canonical bank identifier to the surface-text
/// aliases that aggregator sites use for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankAliasTable {
    aliases: BTreeMap<String, Vec<String>>,
}

impl BankAliasTable {
    /// Build a table for the given bank identifiers. Each bank matches on its
    /// own name; `overrides` adds extra aliases per canonical identifier.
    pub fn new(banks: &[String], overrides: &BTreeMap<String, Vec<String>>) -> Self {
        let mut aliases = BTreeMap::new();
        for bank in banks {
            let mut list = vec![bank.clone()];
            if let Some(extra) = overrides.get(bank) {
                for alias in extra {
                    if !list.contains(alias) {
                        list.push(alias.clone());
                    }
                }
            }
            aliases.insert(bank.clone(), list);
        }
        Self { aliases }
    }

    /// Resolve a free-text bank name from an aggregator site to a canonical
    /// identifier. Matching is case-insensitive substring; when several
    /// aliases match, the longest alias wins.
    pub fn resolve(&self, surface: &str) -> Option<&str> {
        let surface = surface.to_lowercase();
        let mut best: Option<(&str, usize)> = None;
        for (canonical, list) in &self.aliases {
            for alias in list {
                if surface.contains(&alias.to_lowercase()) {
                    let matched = alias.len();
                    if best.map_or(true, |(_, len)| matched > len) {
                        best = Some((canonical.as_str(), matched));
                    }
                }
            }
        }
        best.map(|(canonical, _)| canonical)
    }
}
