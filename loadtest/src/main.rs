use decentralbet_loadtest::config::Config;
use decentralbet_loadtest::runner;
use decentralbet_loadtest::scenario::SCENARIOS;
use goose::config::GooseConfiguration;
use gumdrop::Options;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "decentralbet_loadtest=info,goose=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        "Loaded configuration: host={}, scenario={}",
        config.host, config.scenario
    );
    if !config.profiles.is_empty() {
        info!("Profile filter: {}", config.profiles.join(", "));
    }
    if !config.think_time {
        info!("Think time disabled");
    }
    for preset in SCENARIOS {
        debug!(
            "Available scenario {}: {} users, {}/s, {} ({})",
            preset.name, preset.users, preset.spawn_rate, preset.duration, preset.description
        );
    }

    // Goose flags (--host, --users, --report-file, ...) override the preset
    let goose_config = GooseConfiguration::parse_args_default_or_exit();

    let report = runner::run(&config, goose_config).await?;
    info!(
        "Run against {} finished: {} requests, {:.1}% failed",
        report.host,
        report.summary.total_requests,
        report.summary.failure_rate() * 100.0
    );

    Ok(())
}
