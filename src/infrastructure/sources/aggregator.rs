//! Aggregator listing extractor: one page, many banks.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info};

use crate::shared::errors::SourceError;
use crate::shared::types::{is_plausible_rate, RateMap};

use super::page::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use super::traits::AggregateSource;

pub struct ListingPageSource {
    name: String,
    url: String,
    /// Two capture groups: bank surface name, then rate.
    entry_pattern: Regex,
    client: reqwest::Client,
}

impl ListingPageSource {
    pub fn new(name: String, url: String, entry_pattern: &str) -> Result<Self, SourceError> {
        let entry_pattern = Regex::new(entry_pattern)
            .map_err(|e| SourceError::InvalidPattern(e.to_string()))?;
        if entry_pattern.captures_len() < 3 {
            return Err(SourceError::InvalidPattern(format!(
                "entry pattern for {} needs (name, rate) capture groups",
                name
            )));
        }
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self {
            name,
            url,
            entry_pattern,
            client,
        })
    }

    /// All (bank, rate) pairs on the page. Trademark glyphs are stripped from
    /// names; duplicates keep the highest rate.
    fn extract_rates(&self, body: &str) -> RateMap {
        let mut rates = RateMap::new();
        for caps in self.entry_pattern.captures_iter(body) {
            let (name, rate_text) = match (caps.get(1), caps.get(2)) {
                (Some(n), Some(r)) => (n.as_str(), r.as_str()),
                _ => continue,
            };
            let name: String = name
                .trim()
                .chars()
                .filter(|c| *c != '®' && *c != '™')
                .collect::<String>()
                .trim()
                .to_string();
            if name.is_empty() {
                continue;
            }
            let rate = match rate_text.parse::<f64>() {
                Ok(r) if is_plausible_rate(r) => r,
                _ => {
                    debug!("Skipping {} entry '{}': rate '{}'", self.name, name, rate_text);
                    continue;
                }
            };
            let entry = rates.entry(name).or_insert(rate);
            if rate > *entry {
                *entry = rate;
            }
        }
        rates
    }
}

#[async_trait]
impl AggregateSource for ListingPageSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rates(&self) -> Result<RateMap, SourceError> {
        debug!("Fetching aggregator listing: {}", self.name);
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

        let rates = self.extract_rates(&body);
        info!("✓ {}: {} banks listed", self.name, rates.len());
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pattern: &str) -> ListingPageSource {
        ListingPageSource::new(
            "Investopedia".to_string(),
            "https://example.com".to_string(),
            pattern,
        )
        .unwrap()
    }

    #[test]
    fn test_extracts_listing_entries() {
        let s = source(r"<a>([^<]+)</a>\s*<strong>(\d+\.\d+)% APY</strong>");
        let body = concat!(
            "<li><a>UFB Direct</a> <strong>4.55% APY</strong></li>",
            "<li><a>Vio Bank®</a> <strong>4.46% APY</strong></li>",
            "<li><a>Weird Bank</a> <strong>46.00% APY</strong></li>",
        );
        let rates = s.extract_rates(body);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get("UFB Direct"), Some(&4.55));
        // trademark glyph stripped
        assert_eq!(rates.get("Vio Bank"), Some(&4.46));
        // implausible rate dropped
        assert!(!rates.contains_key("Weird Bank"));
    }

    #[test]
    fn test_duplicate_listing_keeps_highest() {
        let s = source(r"<a>([^<]+)</a>\s*<strong>(\d+\.\d+)%</strong>");
        let body = "<a>UFB</a> <strong>4.20%</strong><a>UFB</a> <strong>4.55%</strong>";
        let rates = s.extract_rates(body);
        assert_eq!(rates.get("UFB"), Some(&4.55));
    }

    #[test]
    fn test_pattern_must_have_two_groups() {
        let result = ListingPageSource::new(
            "Bad".to_string(),
            "https://example.com".to_string(),
            r"(\d+\.\d+)%",
        );
        assert!(matches!(result, Err(SourceError::InvalidPattern(_))));
    }
}
