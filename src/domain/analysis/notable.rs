//! Notable market mentions: jumps, new top-10 entrants, close competitors

use crate::shared::types::RateMap;

/// Minimum positive delta for a rate jump to be worth mentioning.
pub const RATE_JUMP_THRESHOLD: f64 = 0.05;
/// How close to the best tracked rate a competitor must be to qualify.
pub const CLOSE_COMPETITOR_MARGIN: f64 = 0.10;
/// Size of the leaderboard used for new-entrant detection.
pub const TOP_SET_SIZE: usize = 10;

pub const MAX_RATE_JUMPS: usize = 3;
pub const MAX_NEW_ENTRANTS: usize = 2;
pub const MAX_CLOSE_COMPETITORS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionKind {
    RateJump,
    NewEntrant,
    CloseCompetitor,
}

/// One market-rate event worth surfacing in the digest.
#[derive(Debug, Clone, PartialEq)]
pub struct NotableMention {
    pub kind: MentionKind,
    pub bank: String,
    pub rate: f64,
    /// Rate delta since the previous snapshot; only set for RateJump.
    pub delta: Option<f64>,
}

/// Banks ranked by rate descending. The input map iterates in name order, so
/// a stable sort leaves rate ties in lexicographic order.
fn ranked(rates: &RateMap) -> Vec<(&str, f64)> {
    let mut list: Vec<(&str, f64)> = rates.iter().map(|(b, &r)| (b.as_str(), r)).collect();
    list.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    list
}

/// Compare the latest market snapshot against the previous one and surface up
/// to 3 rate jumps, 2 new top-10 entrants, and 2 close competitors, in that
/// order. Every sub-analysis degrades to an empty contribution on empty
/// inputs.
pub fn compute_notable_mentions(
    current_market: &RateMap,
    previous_market: &RateMap,
    current_primary: &RateMap,
) -> Vec<NotableMention> {
    let mut mentions = Vec::new();

    // 1. Biggest positive rate jumps among banks present in both snapshots
    let mut jumps: Vec<(&str, f64, f64)> = Vec::new();
    for (bank, &rate) in current_market {
        if let Some(&previous) = previous_market.get(bank) {
            let delta = rate - previous;
            if delta > RATE_JUMP_THRESHOLD {
                jumps.push((bank.as_str(), rate, delta));
            }
        }
    }
    jumps.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
    for (bank, rate, delta) in jumps.into_iter().take(MAX_RATE_JUMPS) {
        mentions.push(NotableMention {
            kind: MentionKind::RateJump,
            bank: bank.to_string(),
            rate,
            delta: Some(delta),
        });
    }

    // 2. New entrants to the market top 10. Skipped on the first run: with no
    // previous snapshot every bank would be "new".
    if !previous_market.is_empty() {
        let previous_top: Vec<&str> = ranked(previous_market)
            .into_iter()
            .take(TOP_SET_SIZE)
            .map(|(b, _)| b)
            .collect();
        let entrants = ranked(current_market)
            .into_iter()
            .take(TOP_SET_SIZE)
            .filter(|(bank, _)| !previous_top.contains(bank))
            .take(MAX_NEW_ENTRANTS);
        for (bank, rate) in entrants {
            mentions.push(NotableMention {
                kind: MentionKind::NewEntrant,
                bank: bank.to_string(),
                rate,
                delta: None,
            });
        }
    }

    // 3. Competitors at or above our best tracked rate, within the margin
    if let Some(best_tracked) = current_primary.values().cloned().reduce(f64::max) {
        let mut close: Vec<(&str, f64)> = current_market
            .iter()
            .filter(|(_, &rate)| rate >= best_tracked && rate - best_tracked <= CLOSE_COMPETITOR_MARGIN)
            .map(|(b, &r)| (b.as_str(), r))
            .collect();
        close.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (bank, rate) in close.into_iter().take(MAX_CLOSE_COMPETITORS) {
            mentions.push(NotableMention {
                kind: MentionKind::CloseCompetitor,
                bank: bank.to_string(),
                rate,
                delta: None,
            });
        }
    }

    mentions
}
