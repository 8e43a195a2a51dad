//! Renders one run's analysis into the alert digest.
//!
//! Pure data-to-text: the only numeric work here is decimal formatting
//! (2 places for rates and deltas, 0 for consistency percentages, 3 for
//! stability means) and rank ordering.

use chrono::{DateTime, Local};

use crate::domain::analysis::{MentionKind, NotableMention, TrendReport};
use crate::shared::types::RateMap;

/// How many market banks the digest lists.
pub const MARKET_TOP_N: usize = 15;

/// Everything the digest renders. All references point at the same immutable
/// snapshots the analysis ran over.
#[derive(Debug, Clone, Copy)]
pub struct DigestContext<'a> {
    pub timestamp: DateTime<Local>,
    /// Tracked-bank rates observed this run.
    pub primary: &'a RateMap,
    /// Last-known rates, used only for delta annotations.
    pub last_rates: &'a RateMap,
    pub supplementary: &'a RateMap,
    pub market: &'a RateMap,
    pub failures: &'a [String],
    pub mentions: &'a [NotableMention],
    pub trend: &'a TrendReport,
    /// Total number of configured tracked banks (for the "n/total" header).
    pub tracked_total: usize,
}

fn ranked(rates: &RateMap) -> Vec<(&str, f64)> {
    let mut list: Vec<(&str, f64)> = rates.iter().map(|(b, &r)| (b.as_str(), r)).collect();
    list.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    list
}

fn rank_glyph(position: usize) -> &'static str {
    match position {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "📊",
    }
}

pub fn format_digest(ctx: &DigestContext) -> String {
    let mut msg = format!(
        "🔔 *HYSA Rate Alert - {}*\n\n",
        ctx.timestamp.format("%Y-%m-%d %H:%M")
    );

    msg.push_str(&format!(
        "*📌 MY TRACKED BANKS ({}/{} banks)*\n",
        ctx.primary.len(),
        ctx.tracked_total
    ));
    msg.push_str(&"=".repeat(40));
    msg.push('\n');
    for (i, (bank, rate)) in ranked(ctx.primary).into_iter().enumerate() {
        let position = i + 1;
        let change = match ctx.last_rates.get(bank) {
            Some(&last) => {
                let diff = rate - last;
                if diff > 0.0 {
                    format!(" (↑ +{:.2}%)", diff)
                } else if diff < 0.0 {
                    format!(" (↓ {:.2}%)", diff)
                } else {
                    String::new()
                }
            }
            None => String::new(),
        };
        msg.push_str(&format!(
            "{} #{}. {}: {:.2}%{}\n",
            rank_glyph(position),
            position,
            bank,
            rate,
            change
        ));
    }

    if !ctx.failures.is_empty() {
        msg.push_str(&format!(
            "\n⚠️ *Failed to scrape ({}):* {}\n",
            ctx.failures.len(),
            ctx.failures.join(", ")
        ));
    }

    if !ctx.supplementary.is_empty() {
        msg.push_str("\n*💡 SUPPLEMENTARY BANKS (Monitoring)*\n");
        msg.push_str(&"=".repeat(40));
        msg.push('\n');
        for (bank, rate) in ranked(ctx.supplementary) {
            msg.push_str(&format!("• {}: {:.2}%\n", bank, rate));
        }
    }

    if !ctx.market.is_empty() {
        msg.push_str(&format!(
            "\n*🌐 OTHER TOP MARKET RATES (Top {} of {} banks)*\n",
            MARKET_TOP_N.min(ctx.market.len()),
            ctx.market.len()
        ));
        msg.push_str(&"=".repeat(40));
        msg.push('\n');
        for (i, (bank, rate)) in ranked(ctx.market).into_iter().take(MARKET_TOP_N).enumerate() {
            msg.push_str(&format!("#{}. {}: {:.2}%\n", i + 1, bank, rate));
        }

        if !ctx.mentions.is_empty() {
            msg.push_str("\n*⭐ NOTABLE MENTIONS*\n");
            for mention in ctx.mentions {
                msg.push_str(&format_mention(mention));
                msg.push('\n');
            }
        }

        msg.push_str(&format!(
            "\n_💾 Full market data ({} banks) saved to market_rates_history.json_\n",
            ctx.market.len()
        ));
    }

    msg.push('\n');
    msg.push_str(&format_trend_report(ctx.trend));
    msg
}

fn format_mention(mention: &NotableMention) -> String {
    match mention.kind {
        MentionKind::RateJump => format!(
            "📈 *{}*: {:.2}% (↑ +{:.2}%)",
            mention.bank,
            mention.rate,
            mention.delta.unwrap_or(0.0)
        ),
        MentionKind::NewEntrant => {
            format!("🆕 *{}*: {:.2}% (New to top 10!)", mention.bank, mention.rate)
        }
        MentionKind::CloseCompetitor => format!(
            "🎯 *{}*: {:.2}% (Within 0.10% of your best!)",
            mention.bank, mention.rate
        ),
    }
}

pub fn format_trend_report(report: &TrendReport) -> String {
    if report.is_empty() {
        return "No historical data yet.".to_string();
    }

    let mut out = format!("*📊 Analysis (Last {} Snapshot(s))*\n", report.entries);
    out.push_str(&"-".repeat(42));
    out.push('\n');

    out.push_str("*🏆 Consistency Leaderboard (Most days at #1)*\n");
    for entry in &report.consistency {
        out.push_str(&format!("• {}: {:.0}% of the time\n", entry.bank, entry.percentage));
    }

    out.push_str("\n*⚖️ Stability Score (Average APY)*\n");
    for entry in &report.stability {
        out.push_str(&format!("• {}: {:.3}%\n", entry.bank, entry.mean_rate));
    }

    out
}
