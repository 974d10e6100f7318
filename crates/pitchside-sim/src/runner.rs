use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use pitchside_bowling::error::DeliveryError;
use pitchside_core::delivery::{BowlingMode, DeliveryEvent, EndReason, Side};
use pitchside_core::math::Vec3;

use crate::config::DeliveryPlan;
use crate::marker::MarkerConfig;
use crate::session::BowlingSession;

/// Where and how the ball bounced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BounceRecord {
    pub point: Vec3,
    pub velocity: Vec3,
}

/// How the delivery concluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndRecord {
    pub reason: EndReason,
    pub point: Vec3,
}

/// Summary of one simulated delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReport {
    pub index: usize,
    pub mode: BowlingMode,
    pub side: Side,
    pub power: f32,
    pub target: Vec3,
    pub launch_velocity: Vec3,
    pub flight_time: f32,
    pub bounce: Option<BounceRecord>,
    pub end: Option<EndRecord>,
    pub ticks: u64,
    /// The delivery hit the time cap and was reset without ending.
    pub timed_out: bool,
}

/// Set up the session for `plan`, bowl, and step at `dt` until the delivery
/// ends or `max_secs` elapse.
pub fn run_delivery(
    session: &mut BowlingSession,
    index: usize,
    plan: &DeliveryPlan,
    dt: f32,
    max_secs: f32,
) -> Result<DeliveryReport, DeliveryError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(DeliveryError::InvalidConfig(format!(
            "timestep must be positive and finite, got {dt}"
        )));
    }
    if !(max_secs.is_finite() && max_secs > 0.0) {
        return Err(DeliveryError::InvalidConfig(format!(
            "delivery time cap must be positive and finite, got {max_secs}"
        )));
    }
    session.select_mode(plan.mode);
    if session.side() != plan.side {
        session.toggle_side();
    }
    session.meter_mut().seek_power(plan.power);
    session.marker_mut().place(plan.target_x, plan.target_z);

    let launch = session.bowl()?;
    let params = session
        .sim()
        .delivery()
        .params()
        .copied()
        .ok_or(DeliveryError::NotIdle {
            phase: session.phase(),
        })?;

    let mut report = DeliveryReport {
        index,
        mode: params.mode,
        side: params.side,
        power: params.power,
        target: session.marker().position(),
        launch_velocity: launch.velocity,
        flight_time: launch.flight_time,
        bounce: None,
        end: None,
        ticks: 0,
        timed_out: false,
    };

    let max_ticks = (max_secs / dt).ceil() as u64;
    while report.ticks < max_ticks {
        report.ticks += 1;
        for event in session.step(dt) {
            match event {
                DeliveryEvent::Bounced {
                    point, velocity, ..
                } => report.bounce = Some(BounceRecord { point, velocity }),
                DeliveryEvent::Ended { reason, point } => {
                    report.end = Some(EndRecord { reason, point });
                },
            }
        }
        if report.end.is_some() {
            return Ok(report);
        }
    }

    tracing::warn!(index, ticks = report.ticks, "Delivery hit the time cap, resetting");
    report.timed_out = true;
    session.reset_game();
    Ok(report)
}

/// Generate `count` reproducible deliveries spread over the marker range.
pub fn random_plans(
    seed: u64,
    count: usize,
    marker: &MarkerConfig,
) -> Result<Vec<DeliveryPlan>, DeliveryError> {
    marker.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let [x_min, x_max] = marker.straight_limits;
    let [z_min, z_max] = marker.length_limits;
    let plans = (0..count)
        .map(|_| DeliveryPlan {
            mode: if rng.random_bool(0.5) {
                BowlingMode::Swing
            } else {
                BowlingMode::Spin
            },
            side: if rng.random_bool(0.5) {
                Side::Off
            } else {
                Side::Leg
            },
            power: rng.random_range(0.0..=1.0),
            target_x: rng.random_range(x_min..=x_max),
            target_z: rng.random_range(z_min..=z_max),
        })
        .collect();
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn random_plans_are_reproducible() {
        let marker = MarkerConfig::default();
        let a = random_plans(42, 8, &marker).unwrap();
        let b = random_plans(42, 8, &marker).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, random_plans(43, 8, &marker).unwrap());
    }

    #[test]
    fn random_plans_stay_in_range() {
        let marker = MarkerConfig::default();
        for plan in random_plans(1, 64, &marker).unwrap() {
            assert!((0.0..=1.0).contains(&plan.power));
            assert!((-1.2..=1.2).contains(&plan.target_x));
            assert!((8.0..=18.0).contains(&plan.target_z));
        }
    }

    #[test]
    fn inverted_marker_range_rejected() {
        let marker = MarkerConfig {
            straight_limits: [1.2, -1.2],
            ..Default::default()
        };
        assert!(random_plans(1, 4, &marker).is_err());
    }

    #[test]
    fn degenerate_timestep_rejected() {
        let mut session = crate::session_from_config(&SimConfig::default()).unwrap();
        let plan = SimConfig::default().deliveries.remove(0);
        for dt in [0.0, -0.02, f32::NAN, 1.0 / f32::INFINITY] {
            assert!(matches!(
                run_delivery(&mut session, 0, &plan, dt, 10.0),
                Err(DeliveryError::InvalidConfig(_))
            ));
        }
        assert!(run_delivery(&mut session, 0, &plan, 0.02, f32::INFINITY).is_err());
        assert!(session.controls_enabled());
    }
}
