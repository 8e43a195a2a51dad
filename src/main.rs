use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use ratewatch::{ConfigLoader, RateTracker, TrackerConfig};

#[derive(Parser, Debug)]
#[command(name = "ratewatch", about = "HYSA rate tracker and alert bot")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "Config.toml")]
    config: String,

    /// Notification mode: always, smart, weekly, monthly, never
    #[arg(long)]
    mode: Option<String>,

    /// Slack incoming webhook URL
    #[arg(long)]
    webhook_url: Option<String>,

    /// Directory for history and state files
    #[arg(long)]
    data_dir: Option<String>,

    /// Trend analysis window, in observations
    #[arg(long)]
    window: Option<usize>,

    /// Collect and report without persisting or notifying
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = if Path::new(&args.config).exists() {
        info!("Loading configuration from {}", args.config);
        ConfigLoader::load(&args.config)?
    } else {
        info!("No config file at {}, using built-in defaults", args.config);
        TrackerConfig::default()
    };

    config.apply_env();

    // CLI flags override both file and environment
    if let Some(mode) = args.mode {
        config.notify.mode = mode;
    }
    if let Some(url) = args.webhook_url {
        config.notify.webhook_url = Some(url);
    }
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = dir.into();
    }
    if let Some(window) = args.window {
        config.analysis.window = window;
    }

    let tracker = RateTracker::new(config, args.dry_run)?;
    let output = tracker.run().await?;

    info!(
        "Run complete: notify={} reason={}",
        output.should_notify, output.notify_reason
    );
    Ok(())
}
