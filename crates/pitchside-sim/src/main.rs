use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use pitchside_sim::config::SimConfig;
use pitchside_sim::runner::run_delivery;
use pitchside_sim::{delivery_plans, session_from_config};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::load();
    let mut session = match session_from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Invalid simulation config");
            return ExitCode::FAILURE;
        },
    };

    let plans = match delivery_plans(&config) {
        Ok(plans) => plans,
        Err(e) => {
            tracing::error!(error = %e, "Invalid delivery plans");
            return ExitCode::FAILURE;
        },
    };
    tracing::info!(deliveries = plans.len(), tick_rate_hz = config.tick_rate_hz, "Pitchside starting");

    let dt = config.dt();
    let mut failures = 0;
    for (index, plan) in plans.iter().enumerate() {
        match run_delivery(&mut session, index, plan, dt, config.max_delivery_secs) {
            Ok(report) => match serde_json::to_string(&report) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!(index, error = %e, "Failed to encode report"),
            },
            Err(e) => {
                failures += 1;
                tracing::warn!(index, error = %e, "Delivery rejected");
            },
        }
    }

    if failures == plans.len() && !plans.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
