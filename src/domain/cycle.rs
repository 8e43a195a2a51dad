//! Single analysis entry point, run once per collection cycle.
//!
//! The orchestration calls this after collection and before persistence or
//! dispatch. Everything here is pure: the same inputs and the same `now`
//! produce bit-identical output.

use chrono::{DateTime, Local};

use crate::domain::analysis::{compute_notable_mentions, compute_trend_report, NotableMention, TrendReport};
use crate::domain::notification::{decide, NotificationMode, PolicyInputs};
use crate::domain::report::{format_digest, DigestContext};
use crate::shared::config::Thresholds;
use crate::shared::types::{MarketSnapshot, RateMap, RateObservation};

/// Inputs to one analysis cycle. `history` and `market_history` are the
/// persisted sequences as loaded, i.e. without this run's entries; the cycle
/// appends the fresh observation internally for trend purposes.
#[derive(Debug, Clone, Copy)]
pub struct CycleInput<'a> {
    pub primary: &'a RateMap,
    pub supplementary: &'a RateMap,
    pub market: &'a RateMap,
    pub failures: &'a [String],
    pub history: &'a [RateObservation],
    pub market_history: &'a [MarketSnapshot],
    pub last_rates: &'a RateMap,
    pub mode: &'a NotificationMode,
    pub thresholds: Thresholds,
    pub window: usize,
    pub tracked_total: usize,
    pub now: DateTime<Local>,
}

/// Everything the orchestration needs to persist, log and dispatch.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    pub trend_report: TrendReport,
    pub notable_mentions: Vec<NotableMention>,
    pub should_notify: bool,
    pub notify_reason: String,
    pub formatted_message: String,
}

pub fn run_analysis_cycle(input: CycleInput) -> CycleOutput {
    // Trend analysis covers prior history plus this run's observation
    let mut full_history: Vec<RateObservation> = input.history.to_vec();
    full_history.push(RateObservation {
        timestamp: input.now,
        rates: input.primary.clone(),
    });
    let trend_report = compute_trend_report(&full_history, input.window);

    let empty = RateMap::new();
    let previous_market = input
        .market_history
        .last()
        .map(|snapshot| &snapshot.banks)
        .unwrap_or(&empty);

    let notable_mentions = compute_notable_mentions(input.market, previous_market, input.primary);

    let decision = decide(
        input.mode,
        &PolicyInputs {
            current: input.primary,
            last: input.last_rates,
            market: input.market,
            previous_market,
        },
        &input.thresholds,
        input.now,
    );

    let formatted_message = format_digest(&DigestContext {
        timestamp: input.now,
        primary: input.primary,
        last_rates: input.last_rates,
        supplementary: input.supplementary,
        market: input.market,
        failures: input.failures,
        mentions: &notable_mentions,
        trend: &trend_report,
        tracked_total: input.tracked_total,
    });

    CycleOutput {
        trend_report,
        notable_mentions,
        should_notify: decision.should_notify,
        notify_reason: decision.reason,
        formatted_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::MentionKind;
    use chrono::TimeZone;

    fn rates(pairs: &[(&str, f64)]) -> RateMap {
        pairs.iter().map(|(b, r)| (b.to_string(), *r)).collect()
    }

    #[test]
    fn test_full_cycle_on_quiet_monday() {
        let primary = rates(&[("Ally", 4.20), ("Sofi", 3.80)]);
        let supplementary = rates(&[("Wealthfront", 4.00)]);
        let market = rates(&[("UFB", 4.25), ("Vio", 4.10)]);
        let last = rates(&[("Ally", 4.20), ("Sofi", 3.85)]);
        let history = vec![RateObservation {
            timestamp: Local.with_ymd_and_hms(2025, 6, 8, 9, 0, 0).unwrap(),
            rates: last.clone(),
        }];
        let market_history = vec![MarketSnapshot {
            timestamp: Local.with_ymd_and_hms(2025, 6, 8, 9, 0, 0).unwrap(),
            banks: rates(&[("UFB", 4.10), ("Vio", 4.10)]),
        }];
        let mode = NotificationMode::Smart;

        let output = run_analysis_cycle(CycleInput {
            primary: &primary,
            supplementary: &supplementary,
            market: &market,
            failures: &[],
            history: &history,
            market_history: &market_history,
            last_rates: &last,
            mode: &mode,
            thresholds: Thresholds::default(),
            window: 30,
            tracked_total: 7,
            now: Local.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap(),
        });

        // the new observation joins the trend window
        assert_eq!(output.trend_report.entries, 2);

        // UFB jumped 0.15 since the previous market snapshot
        assert!(output
            .notable_mentions
            .iter()
            .any(|m| m.kind == MentionKind::RateJump && m.bank == "UFB"));

        // UFB gap 0.05 is under the rise threshold and Sofi's 0.05 drop is
        // under the drop threshold: stay quiet
        assert!(!output.should_notify);
        assert_eq!(output.notify_reason, "No significant changes detected");

        assert!(output.formatted_message.contains("MY TRACKED BANKS (2/7 banks)"));
        assert!(output.formatted_message.contains("Wealthfront"));
        assert!(output.formatted_message.contains("UFB"));
    }

    #[test]
    fn test_cycle_without_any_prior_state() {
        let primary = rates(&[("Ally", 4.20)]);
        let empty = RateMap::new();
        let mode = NotificationMode::Smart;

        let output = run_analysis_cycle(CycleInput {
            primary: &primary,
            supplementary: &empty,
            market: &empty,
            failures: &[],
            history: &[],
            market_history: &[],
            last_rates: &empty,
            mode: &mode,
            thresholds: Thresholds::default(),
            window: 30,
            tracked_total: 7,
            now: Local.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap(),
        });

        assert_eq!(output.trend_report.entries, 1);
        assert!(output.notable_mentions.is_empty());
        assert!(!output.should_notify);
    }

    #[test]
    fn test_cycle_is_deterministic() {
        let primary = rates(&[("Ally", 3.80)]);
        let last = rates(&[("Ally", 4.00)]);
        let empty = RateMap::new();
        let mode = NotificationMode::Smart;
        let now = Local.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap();

        let make_input = || CycleInput {
            primary: &primary,
            supplementary: &empty,
            market: &empty,
            failures: &[],
            history: &[],
            market_history: &[],
            last_rates: &last,
            mode: &mode,
            thresholds: Thresholds::default(),
            window: 30,
            tracked_total: 7,
            now,
        };

        let first = run_analysis_cycle(make_input());
        let second = run_analysis_cycle(make_input());
        assert_eq!(first.should_notify, second.should_notify);
        assert_eq!(first.notify_reason, second.notify_reason);
        assert_eq!(first.formatted_message, second.formatted_message);
    }
}
