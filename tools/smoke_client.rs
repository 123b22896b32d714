//! Smoke Test Client
//!
//! Replays named prediction scenarios against a running scoring server and
//! logs the outcome of each one.
//!
//! Usage: `smoke_client [scenario_file]`, with the server address taken from
//! `API_URL` (default `http://localhost:8000`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, warn};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_SCENARIO_FILE: &str = "tools/scenarios.json";

/// One request to send. `feature` is the complete request body so that
/// deliberately malformed payloads can be expressed too.
#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    feature: serde_json::Value,
}

#[derive(Debug, Default)]
struct Tally {
    succeeded: usize,
    rejected: usize,
    unreachable: usize,
}

async fn run_scenario(
    client: &reqwest::Client,
    endpoint: &str,
    scenario: &Scenario,
    tally: &mut Tally,
) {
    info!("Scenario: {}", scenario.name);

    let response = match client.post(endpoint).json(&scenario.feature).send().await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Error connecting to server");
            tally.unreachable += 1;
            return;
        }
    };

    let status = response.status();
    if status.is_success() {
        match response.json::<serde_json::Value>().await {
            Ok(result) => {
                info!("   Success");
                info!("   Customer ID: {}", result["customer_id"]);
                info!("   Prediction:  {}", result["prediction"]);
                info!("   Confidence:  {}", result["confidence"]);
                tally.succeeded += 1;
            }
            Err(e) => {
                warn!(error = %e, "   Success status but unreadable body");
                tally.rejected += 1;
            }
        }
    } else {
        let text = response.text().await.unwrap_or_default();
        warn!("   Failed! Status Code: {}", status.as_u16());
        warn!("   Message: {}", text);
        tally.rejected += 1;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smoke_client=info".parse()?),
        )
        .init();

    let base_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let scenario_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SCENARIO_FILE.to_string());

    let raw = std::fs::read_to_string(&scenario_file)
        .with_context(|| format!("Failed to read scenario file {}", scenario_file))?;
    let scenarios: Vec<Scenario> =
        serde_json::from_str(&raw).context("Failed to parse scenario file")?;

    let endpoint = format!("{}/predict", base_url.trim_end_matches('/'));
    info!(
        endpoint = %endpoint,
        scenarios = scenarios.len(),
        "--- STARTING API TESTS ---"
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let mut tally = Tally::default();
    for scenario in &scenarios {
        run_scenario(&client, &endpoint, scenario, &mut tally).await;
        info!("{}", "-".repeat(30));
    }

    info!(
        succeeded = tally.succeeded,
        rejected = tally.rejected,
        unreachable = tally.unreachable,
        "--- API TESTS COMPLETE ---"
    );

    Ok(())
}
