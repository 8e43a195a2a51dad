//! Generic marketing-page rate extractor.
//!
//! One instance per configured bank: fetch the page, optionally anchor the
//! search at a marker substring, then take the first regex match that passes
//! the plausibility filter. Pages that only render their rate via JavaScript
//! simply come back empty and the bank is recorded as failed for the run.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::shared::errors::SourceError;
use crate::shared::types::is_plausible_rate;

use super::traits::RateSource;

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Fallback pattern: any "N.NN" optionally followed by a percent sign.
pub const DEFAULT_RATE_PATTERN: &str = r"(\d+\.\d+)\s*%?";

/// How far past the marker the rate is expected to appear, in bytes.
const MARKER_SCAN_LEN: usize = 600;

pub struct MarketingPageSource {
    bank: String,
    url: String,
    pattern: Regex,
    marker: Option<String>,
    client: reqwest::Client,
}

impl MarketingPageSource {
    pub fn new(
        bank: String,
        url: String,
        pattern: Option<&str>,
        marker: Option<String>,
    ) -> Result<Self, SourceError> {
        let pattern = Regex::new(pattern.unwrap_or(DEFAULT_RATE_PATTERN))
            .map_err(|e| SourceError::InvalidPattern(e.to_string()))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self {
            bank,
            url,
            pattern,
            marker,
            client,
        })
    }

    /// First plausible rate in the page body. With a marker configured, only
    /// the stretch right after the first marker occurrence is searched.
    fn extract_rate(&self, body: &str) -> Option<f64> {
        let haystack = match &self.marker {
            Some(marker) => {
                let start = body.find(marker.as_str())?;
                let tail = &body[start..];
                tail.get(..MARKER_SCAN_LEN).unwrap_or(tail)
            }
            None => body,
        };

        for caps in self.pattern.captures_iter(haystack) {
            let text = caps.get(1)?.as_str();
            if let Ok(rate) = text.parse::<f64>() {
                if is_plausible_rate(rate) {
                    return Some(rate);
                }
                debug!("Rate {} for {} outside plausible range, skipping", rate, self.bank);
            }
        }
        None
    }
}

#[async_trait]
impl RateSource for MarketingPageSource {
    fn bank(&self) -> &str {
        &self.bank
    }

    async fn fetch_rate(&self) -> Result<Option<f64>, SourceError> {
        debug!("Fetching rate page for {}", self.bank);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::BadStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        match self.extract_rate(&body) {
            Some(rate) => {
                info!("✓ {}: {}%", self.bank, rate);
                Ok(Some(rate))
            }
            None => {
                warn!("✗ {}: no plausible rate found on page", self.bank);
                Ok(None)
            }
        }
    }
}
