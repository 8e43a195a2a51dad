//! Digest rendering - analysis output to human-readable text

pub mod formatter;

pub use formatter::{format_digest, format_trend_report, DigestContext, MARKET_TOP_N};
