//! Spend Scoring API - Main Entry Point
//!
//! Loads configuration, initializes logging, and serves `POST /predict`.

use anyhow::Result;
use spend_scoring_api::config::{AppConfig, LoggingConfig};
use spend_scoring_api::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("spend_scoring_api={}", config.level).parse()?)
        .add_directive(format!("actix_web={}", config.level).parse()?);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Configuration first: it decides how logging is set up
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Spend Scoring API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Spend thresholds: medium>={:.2}, high>={:.2}; confidence range [{:.2}, {:.2}]",
        config.scoring.thresholds.medium,
        config.scoring.thresholds.high,
        config.scoring.confidence.min,
        config.scoring.confidence.max
    );

    server::run(config).await
}
