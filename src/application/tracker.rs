//! Run orchestration: collect, analyze, persist, dispatch.

use chrono::Local;
use tracing::{error, info};

use crate::domain::cycle::{run_analysis_cycle, CycleInput, CycleOutput};
use crate::domain::notification::NotificationMode;
use crate::infrastructure::notify::SlackNotifier;
use crate::infrastructure::sources::SourceRegistry;
use crate::infrastructure::store::HistoryStore;
use crate::shared::config::TrackerConfig;
use crate::shared::errors::AppError;
use crate::shared::types::{MarketSnapshot, RateObservation};

use super::collector::ObservationCollector;

pub struct RateTracker {
    config: TrackerConfig,
    registry: SourceRegistry,
    store: HistoryStore,
    notifier: SlackNotifier,
    dry_run: bool,
}

impl RateTracker {
    pub fn new(config: TrackerConfig, dry_run: bool) -> Result<Self, AppError> {
        let registry = SourceRegistry::from_config(&config)?;
        let store = HistoryStore::new(config.storage.data_dir.clone());
        let notifier = SlackNotifier::new(config.notify.webhook_url.clone())?;
        Ok(Self {
            config,
            registry,
            store,
            notifier,
            dry_run,
        })
    }

    /// One full tracking run. Fails only when configuration is unusable or
    /// no tracked bank produced a rate; per-bank problems and delivery
    /// failures are logged and absorbed.
    pub async fn run(&self) -> Result<CycleOutput, AppError> {
        let now = Local::now();
        info!("Starting rate collection at {}", now.format("%Y-%m-%d %H:%M"));

        let aliases = self.config.alias_table();
        let collector = ObservationCollector::new(
            self.registry.sources(),
            self.registry.aggregates(),
            &aliases,
            &self.config.supplementary_banks(),
        );
        let collected = collector.collect().await;

        if collected.primary.is_empty() {
            // Nothing to compare, persist or report; bail before any state
            // gets touched.
            return Err(AppError::NoDataCollected);
        }

        let history = self.store.load_history();
        let market_history = self.store.load_market_history();
        let last_rates = self.store.load_last_rates();
        let mode = NotificationMode::parse(&self.config.notify.mode);

        let output = run_analysis_cycle(CycleInput {
            primary: &collected.primary,
            supplementary: &collected.supplementary,
            market: &collected.market,
            failures: &collected.failures,
            history: &history,
            market_history: &market_history,
            last_rates: &last_rates,
            mode: &mode,
            thresholds: self.config.thresholds,
            window: self.config.analysis.window,
            tracked_total: self.config.tracked_banks().len(),
            now,
        });

        if self.dry_run {
            info!("Dry run: skipping persistence and delivery");
            println!("{}", output.formatted_message);
            return Ok(output);
        }

        self.store.append_history(RateObservation {
            timestamp: now,
            rates: collected.primary.clone(),
        })?;
        self.store.append_market_snapshot(MarketSnapshot {
            timestamp: now,
            banks: collected.market.clone(),
        })?;
        self.store.save_last_rates(&collected.primary)?;

        if output.should_notify {
            info!("🔔 Notifying: {}", output.notify_reason);
            let message = match mode {
                NotificationMode::Smart => format!(
                    "🚨 *ALERT TRIGGERED*: {}\n\n{}",
                    output.notify_reason, output.formatted_message
                ),
                _ => output.formatted_message.clone(),
            };
            if let Err(e) = self.notifier.send(&message).await {
                // A failed webhook should not lose the already-persisted run
                error!("Notification delivery failed: {}", e);
            }
        } else {
            info!("🔕 Notification suppressed: {}", output.notify_reason);
        }

        Ok(output)
    }
}
