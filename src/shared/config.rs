//! Configuration loading: Config.toml, environment overrides, defaults

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::shared::errors::AppError;
use crate::shared::types::BankAliasTable;

/// One bank target: a marketing page plus extraction hints.
#[derive(Debug, Clone, Deserialize)]
pub struct BankCfg {
    pub name: String,
    pub url: String,
    /// Regex with one capture group for the rate. Falls back to the generic
    /// "N.NN%" pattern when absent.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Substring that anchors the search to the rate section of the page.
    #[serde(default)]
    pub marker: Option<String>,
    /// Supplementary banks are monitored but excluded from history, alerting
    /// and trend analysis.
    #[serde(default)]
    pub supplementary: bool,
}

/// One aggregator site listing many banks' rates at once.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorCfg {
    pub name: String,
    pub url: String,
    /// Regex with two capture groups: bank name, then rate.
    pub entry_pattern: String,
}

/// Smart-mode notification thresholds, in percentage points.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Alert if a tracked bank drops by this much or more.
    pub significant_drop: f64,
    /// Alert if a competitor rises this far above the best tracked rate.
    pub significant_rise: f64,
    /// Re-alert on a known threat only if its gap widened by this much.
    pub gap_widening: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            significant_drop: 0.15,
            significant_rise: 0.20,
            gap_widening: 0.10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyCfg {
    /// One of: always, smart, weekly, monthly, never.
    pub mode: String,
    pub webhook_url: Option<String>,
}

impl Default for NotifyCfg {
    fn default() -> Self {
        Self {
            mode: "smart".to_string(),
            webhook_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    pub data_dir: PathBuf,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisCfg {
    /// Number of most recent history entries the trend report covers.
    pub window: usize,
}

impl Default for AnalysisCfg {
    fn default() -> Self {
        Self { window: 30 }
    }
}

/// Full tracker configuration. Thresholds, bank lists and alias tables are
/// carried here explicitly so tests can vary them without touching
/// process-wide state.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub banks: Vec<BankCfg>,
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub aggregators: Vec<AggregatorCfg>,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub notify: NotifyCfg,
    #[serde(default)]
    pub storage: StorageCfg,
    #[serde(default)]
    pub analysis: AnalysisCfg,
}

impl TrackerConfig {
    /// Names of the primary tracked banks, in declaration order.
    pub fn tracked_banks(&self) -> Vec<String> {
        self.banks
            .iter()
            .filter(|b| !b.supplementary)
            .map(|b| b.name.clone())
            .collect()
    }

    /// Names of the supplementary (monitored-only) banks.
    pub fn supplementary_banks(&self) -> Vec<String> {
        self.banks
            .iter()
            .filter(|b| b.supplementary)
            .map(|b| b.name.clone())
            .collect()
    }

    /// Alias table covering the tracked banks, each matching on its own name
    /// plus the configured alias variations.
    pub fn alias_table(&self) -> BankAliasTable {
        let names: Vec<String> = self.banks.iter().map(|b| b.name.clone()).collect();
        BankAliasTable::new(&names, &self.aliases)
    }

    /// Environment overrides, applied after the file is read:
    /// SLACK_WEBHOOK_URL and NOTIFICATION_MODE.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("SLACK_WEBHOOK_URL") {
            if !url.is_empty() {
                self.notify.webhook_url = Some(url);
            }
        }
        if let Ok(mode) = std::env::var("NOTIFICATION_MODE") {
            if !mode.is_empty() {
                self.notify.mode = mode;
            }
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let bank = |name: &str, url: &str, marker: Option<&str>, supplementary: bool| BankCfg {
            name: name.to_string(),
            url: url.to_string(),
            pattern: None,
            marker: marker.map(str::to_string),
            supplementary,
        };

        let mut aliases = BTreeMap::new();
        aliases.insert(
            "Marcus".to_string(),
            vec!["Marcus by Goldman Sachs".to_string(), "Goldman Sachs".to_string()],
        );
        aliases.insert(
            "Amex".to_string(),
            vec!["American Express".to_string(), "AmEx".to_string()],
        );
        aliases.insert(
            "Capital One".to_string(),
            vec!["Capital One 360".to_string(), "C1".to_string()],
        );

        Self {
            banks: vec![
                bank(
                    "Ally",
                    "https://www.ally.com/bank/online-savings-account/",
                    Some("allysf-rates-v1-value"),
                    false,
                ),
                bank(
                    "Sofi",
                    "https://www.sofi.com/banking/savings-account/",
                    Some("SoFi Plus members can earn up to"),
                    false,
                ),
                bank(
                    "Capital One",
                    "https://www.capitalone.com/bank/savings-accounts/online-performance-savings-account/",
                    Some("rate-type=\"APY\""),
                    false,
                ),
                bank(
                    "Marcus",
                    "https://www.marcus.com/us/en/savings/high-yield-savings",
                    Some("APY"),
                    false,
                ),
                bank(
                    "Barclays",
                    "https://banking.us.barclays/tiered-savings.html",
                    Some("Less than $10,000"),
                    false,
                ),
                bank(
                    "Apple",
                    "https://learn.applecard.apple/savings",
                    Some("typography-intro"),
                    false,
                ),
                bank(
                    "Amex",
                    "https://www.americanexpress.com/en-us/banking/online-savings/high-yield-savings-account/",
                    Some("APY"),
                    false,
                ),
                bank(
                    "Wealthfront",
                    "https://www.wealthfront.com/cash",
                    Some("dynamic-yields-table"),
                    true,
                ),
                bank(
                    "Betterment",
                    "https://www.betterment.com/cash-reserve",
                    Some("item-title"),
                    true,
                ),
            ],
            aliases,
            aggregators: vec![
                AggregatorCfg {
                    name: "Investopedia".to_string(),
                    url: "https://www.investopedia.com/high-yield-savings-accounts-4770633"
                        .to_string(),
                    entry_pattern: r"<a[^>]*>([^<]+)</a>[\s\S]{0,400}?<strong>\s*(\d+\.\d+)%\s*APY"
                        .to_string(),
                },
                AggregatorCfg {
                    name: "Bankrate".to_string(),
                    url: "https://www.bankrate.com/banking/savings/best-high-yield-interests-savings-accounts/"
                        .to_string(),
                    entry_pattern: r#"alt="([^"]+)"[\s\S]{0,600}?APY[\s\S]{0,200}?(\d+\.\d+)%"#
                        .to_string(),
                },
            ],
            thresholds: Thresholds::default(),
            notify: NotifyCfg::default(),
            storage: StorageCfg::default(),
            analysis: AnalysisCfg::default(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<TrackerConfig, AppError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: TrackerConfig = toml::from_str(&content)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_shape() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.tracked_banks().len(), 7);
        assert_eq!(cfg.supplementary_banks(), vec!["Wealthfront", "Betterment"]);
        assert_eq!(cfg.aggregators.len(), 2);
        assert_eq!(cfg.thresholds.significant_drop, 0.15);
        assert_eq!(cfg.thresholds.significant_rise, 0.20);
        assert_eq!(cfg.thresholds.gap_widening, 0.10);
        assert_eq!(cfg.notify.mode, "smart");
        assert_eq!(cfg.analysis.window, 30);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_src = r#"
            [[banks]]
            name = "Ally"
            url = "https://example.com/ally"

            [[banks]]
            name = "Wealthfront"
            url = "https://example.com/wf"
            supplementary = true

            [thresholds]
            significant_drop = 0.25

            [notify]
            mode = "weekly"
        "#;
        let cfg: TrackerConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(cfg.tracked_banks(), vec!["Ally"]);
        assert_eq!(cfg.supplementary_banks(), vec!["Wealthfront"]);
        assert_eq!(cfg.thresholds.significant_drop, 0.25);
        // untouched fields keep their defaults
        assert_eq!(cfg.thresholds.significant_rise, 0.20);
        assert_eq!(cfg.notify.mode, "weekly");
        assert_eq!(cfg.analysis.window, 30);
    }
}
