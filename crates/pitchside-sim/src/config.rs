use serde::{Deserialize, Serialize};

use pitchside_bowling::config::BowlingConfig;
use pitchside_bowling::error::DeliveryError;
use pitchside_bowling::world::PitchWorld;
use pitchside_core::delivery::{BowlingMode, Side};

use crate::marker::MarkerConfig;
use crate::meter::MeterConfig;

/// One scripted delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPlan {
    pub mode: BowlingMode,
    #[serde(default)]
    pub side: Side,
    pub power: f32,
    /// Landing marker position; clamped to the marker limits.
    pub target_x: f32,
    pub target_z: f32,
}

/// Top-level driver configuration, loaded from `pitchside.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub bowling: BowlingConfig,
    pub world: PitchWorld,
    pub meter: MeterConfig,
    pub marker: MarkerConfig,
    pub tick_rate_hz: f32,
    /// Deliveries still running after this long are aborted.
    pub max_delivery_secs: f32,
    /// Seed for generated deliveries.
    pub seed: u64,
    /// Number of generated deliveries appended after the scripted ones.
    pub random_deliveries: usize,
    pub deliveries: Vec<DeliveryPlan>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bowling: BowlingConfig::default(),
            world: PitchWorld::default(),
            meter: MeterConfig::default(),
            marker: MarkerConfig::default(),
            tick_rate_hz: 50.0,
            max_delivery_secs: 10.0,
            seed: 7,
            random_deliveries: 0,
            deliveries: default_deliveries(),
        }
    }
}

fn default_deliveries() -> Vec<DeliveryPlan> {
    vec![
        DeliveryPlan {
            mode: BowlingMode::Swing,
            side: Side::Off,
            power: 0.8,
            target_x: 0.0,
            target_z: 14.0,
        },
        DeliveryPlan {
            mode: BowlingMode::Swing,
            side: Side::Leg,
            power: 0.5,
            target_x: 0.3,
            target_z: 16.0,
        },
        DeliveryPlan {
            mode: BowlingMode::Spin,
            side: Side::Off,
            power: 1.0,
            target_x: -0.4,
            target_z: 17.0,
        },
        DeliveryPlan {
            mode: BowlingMode::Spin,
            side: Side::Leg,
            power: 0.3,
            target_x: 0.2,
            target_z: 12.0,
        },
    ]
}

impl SimConfig {
    /// Load config from the path in `PITCHSIDE_CONFIG`, then
    /// `config/pitchside.toml`, falling back to defaults.
    pub fn load() -> Self {
        let path = std::env::var("PITCHSIDE_CONFIG")
            .unwrap_or_else(|_| "config/pitchside.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<SimConfig>(&content) {
                Ok(cfg) => match cfg.validate() {
                    Ok(()) => cfg,
                    Err(e) => {
                        tracing::warn!("Invalid config in {path}: {e}, using defaults");
                        SimConfig::default()
                    },
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    SimConfig::default()
                },
            },
            Err(_) => SimConfig::default(),
        }
    }

    /// Check every section, including the collaborator ranges and the
    /// derived timestep.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        self.bowling.validate()?;
        self.meter.validate()?;
        self.marker.validate()?;
        let dt = self.dt();
        if !(dt.is_finite() && dt > 0.0) {
            return Err(DeliveryError::InvalidConfig(format!(
                "tick_rate_hz {} gives timestep {dt}",
                self.tick_rate_hz
            )));
        }
        if !(self.max_delivery_secs.is_finite() && self.max_delivery_secs > 0.0) {
            return Err(DeliveryError::InvalidConfig(format!(
                "max_delivery_secs must be positive, got {}",
                self.max_delivery_secs
            )));
        }
        Ok(())
    }

    /// Fixed timestep in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_demo_deliveries() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.deliveries.len(), 4);
        assert_eq!(cfg.dt(), 0.02);
    }

    #[test]
    fn nested_sections_parse() {
        let cfg: SimConfig = toml::from_str(
            r#"
            tick_rate_hz = 100.0
            random_deliveries = 3

            [bowling]
            spin_turn_angle = 15.0
            swing_model = "drift"

            [meter]
            speed = 150.0

            [[deliveries]]
            mode = "spin"
            side = "leg"
            power = 0.9
            target_x = 0.1
            target_z = 13.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.dt(), 0.01);
        assert_eq!(cfg.random_deliveries, 3);
        assert_eq!(cfg.bowling.spin_turn_angle, 15.0);
        assert_eq!(cfg.meter.speed, 150.0);
        assert_eq!(cfg.meter.max, 275.0);
        assert_eq!(cfg.deliveries.len(), 1);
        assert_eq!(cfg.deliveries[0].side, Side::Leg);
    }

    #[test]
    fn shipped_config_parses() {
        let cfg: SimConfig = toml::from_str(include_str!("../../../config/pitchside.toml")).unwrap();
        assert_eq!(cfg.deliveries.len(), 2);
        assert_eq!(cfg.random_deliveries, 4);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.world, PitchWorld::default());
    }

    #[test]
    fn infinite_tick_rate_rejected() {
        let cfg = SimConfig {
            tick_rate_hz: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(cfg.dt(), 0.0);
        assert!(matches!(
            cfg.validate(),
            Err(DeliveryError::InvalidConfig(_))
        ));

        for tick_rate_hz in [0.0, -50.0, f32::NAN] {
            let cfg = SimConfig {
                tick_rate_hz,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "tick rate {tick_rate_hz}");
        }
        assert!(
            SimConfig {
                max_delivery_secs: f32::INFINITY,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_marker_limits_fail_validation() {
        let cfg: SimConfig = toml::from_str("[marker]\nstraight_limits = [1.2, -1.2]").unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(DeliveryError::InvalidConfig(_))
        ));
        assert!(crate::session_from_config(&cfg).is_err());
        assert!(crate::delivery_plans(&cfg).is_err());
    }

    #[test]
    fn plan_side_defaults_to_off() {
        let plan: DeliveryPlan =
            toml::from_str("mode = \"swing\"\npower = 0.5\ntarget_x = 0.0\ntarget_z = 12.0")
                .unwrap();
        assert_eq!(plan.side, Side::Off);
    }
}
