//! Decides whether a run warrants an alert, and why.
//!
//! Pure function over already-collected data: no I/O, no clock reads. The
//! caller supplies `now`, so two calls with identical inputs return identical
//! decisions.

use chrono::{DateTime, Datelike, Local, Weekday};

use crate::shared::config::Thresholds;
use crate::shared::types::RateMap;

/// Closed set of notification modes. Unrecognized strings are carried as
/// `Unknown` and resolve to "always" at decision time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationMode {
    Always,
    Smart,
    Weekly,
    Monthly,
    Never,
    Unknown(String),
}

impl NotificationMode {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "always" => Self::Always,
            "smart" => Self::Smart,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "never" => Self::Never,
            _ => Self::Unknown(s.to_string()),
        }
    }
}

/// The decision and the human-readable justification for it.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDecision {
    pub should_notify: bool,
    pub reason: String,
}

impl NotificationDecision {
    fn yes(reason: impl Into<String>) -> Self {
        Self {
            should_notify: true,
            reason: reason.into(),
        }
    }

    fn no(reason: impl Into<String>) -> Self {
        Self {
            should_notify: false,
            reason: reason.into(),
        }
    }
}

/// Everything the policy looks at. All maps are snapshots of already-collected
/// data; the engine never mutates them.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInputs<'a> {
    /// Rates observed for the tracked banks this run.
    pub current: &'a RateMap,
    /// Last-known tracked-bank rates from the previous successful run.
    pub last: &'a RateMap,
    /// Competitor rates from aggregator sources this run.
    pub market: &'a RateMap,
    /// Competitor rates from the previous market snapshot.
    pub previous_market: &'a RateMap,
}

pub fn decide(
    mode: &NotificationMode,
    inputs: &PolicyInputs,
    thresholds: &Thresholds,
    now: DateTime<Local>,
) -> NotificationDecision {
    match mode {
        NotificationMode::Never => NotificationDecision::no("Notification mode set to 'never'"),
        NotificationMode::Always => NotificationDecision::yes("Always mode - sending notification"),
        NotificationMode::Monthly => {
            if now.day() == 1 {
                NotificationDecision::yes("Monthly digest (1st of month)")
            } else {
                NotificationDecision::no("Not the 1st of the month")
            }
        }
        NotificationMode::Weekly => {
            if now.weekday() == Weekday::Sun {
                NotificationDecision::yes("Weekly digest (Sunday)")
            } else {
                NotificationDecision::no("Not Sunday")
            }
        }
        NotificationMode::Smart => decide_smart(inputs, thresholds, now),
        NotificationMode::Unknown(raw) => {
            NotificationDecision::yes(format!("Unknown mode '{}' - defaulting to always", raw))
        }
    }
}

/// Smart mode: independent triggers ORed together. Reason order is fixed:
/// drops, then competitive threats, then monthly report, then weekly digest.
fn decide_smart(
    inputs: &PolicyInputs,
    thresholds: &Thresholds,
    now: DateTime<Local>,
) -> NotificationDecision {
    let mut reasons = Vec::new();

    // Significant drops in tracked banks since the last run
    for (bank, &current_rate) in inputs.current {
        if let Some(&last_rate) = inputs.last.get(bank) {
            let drop = last_rate - current_rate;
            if drop >= thresholds.significant_drop {
                reasons.push(format!(
                    "🔴 {} dropped {:.2}% (threshold: {}%)",
                    bank, drop, thresholds.significant_drop
                ));
            }
        }
    }

    // Competitive threats: market banks meaningfully above our best rate.
    // A known, stable threat is not re-alerted every run.
    if let Some(best_tracked) = inputs.current.values().cloned().reduce(f64::max) {
        for (bank, &rate) in inputs.market {
            let gap = rate - best_tracked;
            if gap < thresholds.significant_rise {
                continue;
            }
            match inputs.previous_market.get(bank) {
                None => {
                    reasons.push(format!("🔴 NEW: {} is {:.2}% above your best!", bank, gap));
                }
                Some(&previous_rate) => {
                    let previous_gap = previous_rate - best_tracked;
                    if previous_gap < thresholds.significant_rise
                        || gap - previous_gap >= thresholds.gap_widening
                    {
                        reasons.push(format!(
                            "🔴 {} now {:.2}% above your best (was {:.2}%)",
                            bank, gap, previous_gap
                        ));
                    }
                }
            }
        }
    }

    if now.day() == 1 {
        reasons.push("🟢 Monthly comprehensive report (1st of month)".to_string());
    }

    // Sunday digest, unless it is also the 1st (the monthly line already fired)
    if now.weekday() == Weekday::Sun && now.day() != 1 {
        reasons.push("🟡 Weekly digest (Sunday)".to_string());
    }

    if reasons.is_empty() {
        NotificationDecision::no("No significant changes detected")
    } else {
        NotificationDecision::yes(reasons.join(" | "))
    }
}
