pub mod config;
pub mod marker;
pub mod meter;
pub mod runner;
pub mod session;

use pitchside_bowling::error::DeliveryError;

use config::{DeliveryPlan, SimConfig};
use session::BowlingSession;

/// Build a session from the driver config.
pub fn session_from_config(config: &SimConfig) -> Result<BowlingSession, DeliveryError> {
    BowlingSession::new(
        config.bowling.clone(),
        config.world.clone(),
        config.meter.clone(),
        config.marker.clone(),
    )
}

/// Scripted deliveries followed by the seeded random ones.
pub fn delivery_plans(config: &SimConfig) -> Result<Vec<DeliveryPlan>, DeliveryError> {
    let mut plans = config.deliveries.clone();
    plans.extend(runner::random_plans(
        config.seed,
        config.random_deliveries,
        &config.marker,
    )?);
    Ok(plans)
}
