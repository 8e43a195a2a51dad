//! Consistency and stability analytics over the observation history

use std::collections::BTreeMap;

use crate::shared::types::RateObservation;

/// Default number of most recent history entries the report covers.
pub const DEFAULT_WINDOW: usize = 30;

/// How often a bank held the #1 spot inside the window.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsistencyEntry {
    pub bank: String,
    pub wins: usize,
    pub percentage: f64,
}

/// Mean APY of a bank over the window entries it appears in.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityEntry {
    pub bank: String,
    pub mean_rate: f64,
}

/// Structured trend report. `entries == 0` means there is no historical data
/// yet; that is a valid report, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendReport {
    /// Number of history entries actually included (<= requested window).
    pub entries: usize,
    /// Sorted by win count descending, name ascending on ties.
    pub consistency: Vec<ConsistencyEntry>,
    /// Sorted by mean rate descending, name ascending on ties.
    pub stability: Vec<StabilityEntry>,
}

impl TrendReport {
    pub fn empty() -> Self {
        Self {
            entries: 0,
            consistency: Vec::new(),
            stability: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// The winner of one observation: the bank with the strictly highest rate.
/// Ties resolve to the first bank in the map's (lexicographic) order.
fn winner(observation: &RateObservation) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (bank, &rate) in &observation.rates {
        match best {
            Some((_, top)) if rate <= top => {}
            _ => best = Some((bank.as_str(), rate)),
        }
    }
    best.map(|(bank, _)| bank)
}

/// Compute the trend report over the last `window` entries of `history`.
///
/// Consistency tallies how often each bank won a snapshot; stability is the
/// per-bank arithmetic mean over the entries where that bank appears (missing
/// entries are excluded from the denominator, never treated as zero).
pub fn compute_trend_report(history: &[RateObservation], window: usize) -> TrendReport {
    if history.is_empty() {
        return TrendReport::empty();
    }

    let start = history.len().saturating_sub(window);
    let recent = &history[start..];
    let total = recent.len();

    let mut wins: BTreeMap<&str, usize> = BTreeMap::new();
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for observation in recent {
        if let Some(bank) = winner(observation) {
            *wins.entry(bank).or_insert(0) += 1;
        }
        for (bank, &rate) in &observation.rates {
            let entry = sums.entry(bank.as_str()).or_insert((0.0, 0));
            entry.0 += rate;
            entry.1 += 1;
        }
    }

    let mut consistency: Vec<ConsistencyEntry> = wins
        .into_iter()
        .map(|(bank, count)| ConsistencyEntry {
            bank: bank.to_string(),
            wins: count,
            percentage: (count as f64 / total as f64) * 100.0,
        })
        .collect();
    // BTreeMap already yields name order; a stable sort on wins keeps it for ties
    consistency.sort_by(|a, b| b.wins.cmp(&a.wins));

    let mut stability: Vec<StabilityEntry> = sums
        .into_iter()
        .map(|(bank, (sum, count))| StabilityEntry {
            bank: bank.to_string(),
            mean_rate: sum / count as f64,
        })
        .collect();
    stability.sort_by(|a, b| {
        b.mean_rate
            .partial_cmp(&a.mean_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    TrendReport {
        entries: total,
        consistency,
        stability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn observation(rates: &[(&str, f64)]) -> RateObservation {
        RateObservation {
            timestamp: Local.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
            rates: rates.iter().map(|(b, r)| (b.to_string(), *r)).collect(),
        }
    }

    #[test]
    fn test_empty_history_is_no_data() {
        let report = compute_trend_report(&[], DEFAULT_WINDOW);
        assert!(report.is_empty());
        assert!(report.consistency.is_empty());
        assert!(report.stability.is_empty());
    }

    #[test]
    fn test_two_entry_scenario() {
        let history = vec![
            observation(&[("A", 4.0), ("B", 4.1)]),
            observation(&[("A", 4.2), ("B", 4.0)]),
        ];
        let report = compute_trend_report(&history, 30);

        assert_eq!(report.entries, 2);
        for entry in &report.consistency {
            assert_eq!(entry.wins, 1);
            assert_eq!(entry.percentage, 50.0);
        }

        assert_eq!(report.stability[0].bank, "A");
        assert!((report.stability[0].mean_rate - 4.1).abs() < 1e-9);
        assert_eq!(report.stability[1].bank, "B");
        assert!((report.stability[1].mean_rate - 4.05).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_percentages_sum_to_100() {
        let history = vec![
            observation(&[("A", 4.5), ("B", 4.1)]),
            observation(&[("A", 4.0), ("B", 4.3)]),
            observation(&[("A", 4.6), ("B", 4.2)]),
        ];
        let report = compute_trend_report(&history, 30);
        let total: f64 = report.consistency.iter().map(|e| e.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_truncates_old_entries() {
        let mut history: Vec<RateObservation> = (0..10)
            .map(|i| observation(&[("A", 4.0 + i as f64 * 0.01)]))
            .collect();
        history.push(observation(&[("B", 9.0)]));

        let report = compute_trend_report(&history, 1);
        assert_eq!(report.entries, 1);
        assert_eq!(report.consistency.len(), 1);
        assert_eq!(report.consistency[0].bank, "B");
        assert_eq!(report.consistency[0].percentage, 100.0);
    }

    #[test]
    fn test_missing_bank_excluded_from_mean() {
        let history = vec![
            observation(&[("A", 4.0), ("B", 5.0)]),
            observation(&[("A", 4.2)]),
        ];
        let report = compute_trend_report(&history, 30);
        let b = report.stability.iter().find(|e| e.bank == "B").unwrap();
        // one appearance, so the mean is 5.0, not 2.5
        assert!((b.mean_rate - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_winner_tie_breaks_to_first_bank() {
        let history = vec![observation(&[("Zeta", 4.0), ("Alpha", 4.0)])];
        let report = compute_trend_report(&history, 30);
        assert_eq!(report.consistency[0].bank, "Alpha");
    }
}
