use serde::{Deserialize, Serialize};

use pitchside_core::collaborators::TargetSource;
use pitchside_core::collision::{CollisionEvent, SurfaceTag};
use pitchside_core::delivery::{BowlingMode, DeliveryEvent, EndReason, Side};
use pitchside_core::math::{LATERAL, Vec3};

use crate::ball::BallState;
use crate::bounce::{self, BounceInput};
use crate::config::{BowlingConfig, SwingModel};
use crate::error::DeliveryError;
use crate::swing::SwingPath;
use crate::trajectory::{LaunchSolution, solve_launch_with};

/// Lifecycle of a single delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryPhase {
    /// Ball at rest, ready for a delivery.
    #[default]
    Idle,
    /// In flight, not yet bounced.
    Airborne,
    /// Bounced, travelling toward the batting end.
    Bounced,
    /// Ended, waiting for a reset.
    Terminal,
}

/// Caller-supplied inputs for one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryParameters {
    pub mode: BowlingMode,
    /// Normalized release power in `[0, 1]`.
    pub power: f32,
    pub side: Side,
}

impl DeliveryParameters {
    pub fn new(mode: BowlingMode, power: f32, side: Side) -> Self {
        Self { mode, power, side }
    }

    pub fn validate(&self) -> Result<(), DeliveryError> {
        if !self.power.is_finite() {
            return Err(DeliveryError::NonFinite("power"));
        }
        if !(0.0..=1.0).contains(&self.power) {
            return Err(DeliveryError::InvalidPower(self.power));
        }
        Ok(())
    }
}

/// Delivery state machine: owns the ball and the swing path, gates the
/// trajectory solver and the bounce reaction, and reports lifecycle events.
#[derive(Debug, Clone)]
pub struct Delivery {
    config: BowlingConfig,
    start_position: Vec3,
    ball: BallState,
    phase: DeliveryPhase,
    params: Option<DeliveryParameters>,
    swing: Option<SwingPath>,
}

impl Delivery {
    pub fn new(config: BowlingConfig, start_position: Vec3) -> Result<Self, DeliveryError> {
        config.validate()?;
        Ok(Self {
            config,
            start_position,
            ball: BallState::at_rest(start_position),
            phase: DeliveryPhase::Idle,
            params: None,
            swing: None,
        })
    }

    pub fn config(&self) -> &BowlingConfig {
        &self.config
    }

    pub fn phase(&self) -> DeliveryPhase {
        self.phase
    }

    pub fn ball(&self) -> &BallState {
        &self.ball
    }

    pub(crate) fn ball_mut(&mut self) -> &mut BallState {
        &mut self.ball
    }

    /// Parameters of the delivery in flight, if any.
    pub fn params(&self) -> Option<&DeliveryParameters> {
        self.params.as_ref()
    }

    /// Swing curve, present only for curve-model swing deliveries before the
    /// bounce. Once the curve is complete the ball falls under physics.
    pub fn swing_path(&self) -> Option<&SwingPath> {
        self.swing.as_ref()
    }

    /// Whether an external integrator should move the ball this tick.
    pub fn is_physics_driven(&self) -> bool {
        self.ball.is_active && self.ball.physics_enabled
    }

    /// Begin a delivery toward `target`. Only valid from [`DeliveryPhase::Idle`];
    /// a rejected request leaves the ball untouched.
    pub fn start_delivery(
        &mut self,
        params: DeliveryParameters,
        target: &impl TargetSource,
    ) -> Result<LaunchSolution, DeliveryError> {
        if self.phase != DeliveryPhase::Idle {
            return Err(DeliveryError::NotIdle { phase: self.phase });
        }
        params.validate()?;

        let from = self.ball.position;
        let target_position = target.target_position();
        let target_height = target.target_height();
        let launch = solve_launch_with(&self.config, from, target_position, target_height)?;

        let curve = params.mode == BowlingMode::Swing && self.config.swing_model == SwingModel::Curve;
        self.swing = curve.then(|| {
            SwingPath::new(
                from,
                Vec3::new(target_position.x, target_height, target_position.z),
                params.side,
                params.power,
                self.config.swing_strength,
            )
        });

        self.ball.velocity = launch.velocity;
        self.ball.angular_velocity = Vec3::ZERO;
        self.ball.has_bounced = false;
        self.ball.is_active = true;
        self.ball.air_elapsed = 0.0;
        self.ball.total_air_time = launch.flight_time;
        self.ball.physics_enabled = !curve;
        self.ball.trail.clear();
        self.ball.record_trail(self.config.trail_capacity);

        self.params = Some(params);
        self.phase = DeliveryPhase::Airborne;

        tracing::debug!(
            mode = ?params.mode,
            power = params.power,
            side = ?params.side,
            flight_time = launch.flight_time,
            "Delivery started"
        );
        Ok(launch)
    }

    /// Advance scripted motion by `dt` seconds.
    ///
    /// Curve swing deliveries are moved along their path here; every other
    /// airborne ball is left to the external integrator, apart from the
    /// lateral acceleration of drift swing.
    pub fn tick(&mut self, dt: f32) {
        if self.phase != DeliveryPhase::Airborne || !self.ball.is_active || dt <= 0.0 {
            return;
        }
        let Some(params) = self.params else {
            return;
        };

        self.ball.air_elapsed += dt;

        if let Some(path) = self.swing.as_mut() {
            if path.is_complete() {
                // The curve ended without a contact, so the ball keeps the
                // end tangent and falls under gravity. The path stays to
                // supply the bounce direction.
                if !self.ball.physics_enabled {
                    self.ball.physics_enabled = true;
                    tracing::debug!(position = ?self.ball.position, "Swing path ended above the ground");
                }
                return;
            }
            let flight_time = self.ball.total_air_time;
            self.ball.position =
                path.advance(self.ball.air_elapsed, flight_time, self.config.direction_epsilon);
            self.ball.velocity = path.tangent(path.progress()) / flight_time;
        } else if params.mode == BowlingMode::Swing {
            let lateral =
                LATERAL * (params.side.multiplier() * self.config.swing_strength * params.power);
            self.ball.velocity += lateral * dt;
        }
    }

    /// Record the ball's current position in its trail while a delivery is
    /// in flight.
    pub fn record_trail(&mut self) {
        if self.ball.is_active {
            self.ball.record_trail(self.config.trail_capacity);
        }
    }

    /// React to one collision. Termination is checked before the bounce, so
    /// a contact that ends the delivery never triggers a bounce reaction.
    pub fn handle_collision(&mut self, event: &CollisionEvent) -> Option<DeliveryEvent> {
        match self.phase {
            DeliveryPhase::Airborne | DeliveryPhase::Bounced => {},
            DeliveryPhase::Idle | DeliveryPhase::Terminal => {
                tracing::debug!(surface = ?event.surface, phase = ?self.phase, "Collision ignored");
                return None;
            },
        }

        if let Some(reason) = event.surface.end_reason() {
            return Some(self.terminate(reason, event.point));
        }
        match event.surface {
            SurfaceTag::PitchSurface => {
                if self.phase == DeliveryPhase::Airborne && !self.ball.has_bounced {
                    self.bounce(event.point)
                } else {
                    None
                }
            },
            SurfaceTag::EndMarker | SurfaceTag::GeneralGround | SurfaceTag::Other => None,
        }
    }

    /// React to the collisions detected in one tick, in order. Contacts after
    /// the one that ends the delivery are dropped.
    pub fn handle_collisions(&mut self, events: &[CollisionEvent]) -> Vec<DeliveryEvent> {
        let mut out = Vec::new();
        for event in events {
            if let Some(reaction) = self.handle_collision(event) {
                let ended = matches!(reaction, DeliveryEvent::Ended { .. });
                out.push(reaction);
                if ended {
                    break;
                }
            }
        }
        out
    }

    /// Return to the pre-delivery rest pose. Callable at any time; aborts a
    /// delivery in flight.
    pub fn reset_ball(&mut self) {
        self.ball.reset(self.start_position);
        self.swing = None;
        self.params = None;
        self.phase = DeliveryPhase::Idle;
    }

    fn bounce(&mut self, point: Vec3) -> Option<DeliveryEvent> {
        let params = self.params?;
        let input = BounceInput {
            mode: params.mode,
            power: params.power,
            side: params.side,
            velocity: self.ball.velocity,
            swing_direction: self.swing.as_ref().map(SwingPath::current_direction),
        };
        let velocity = bounce::react(&input, &self.config);

        self.ball.velocity = velocity;
        self.ball.has_bounced = true;
        self.ball.physics_enabled = true;
        self.swing = None;
        self.phase = DeliveryPhase::Bounced;

        tracing::debug!(mode = ?params.mode, ?point, ?velocity, "Delivery bounced");
        Some(DeliveryEvent::Bounced {
            mode: params.mode,
            point,
            velocity,
        })
    }

    fn terminate(&mut self, reason: EndReason, point: Vec3) -> DeliveryEvent {
        self.ball.velocity = Vec3::ZERO;
        self.ball.is_active = false;
        self.ball.physics_enabled = false;
        self.phase = DeliveryPhase::Terminal;
        tracing::debug!(?reason, ?point, "Delivery ended");

        if self.config.auto_reset {
            self.reset_ball();
        }
        DeliveryEvent::Ended { reason, point }
    }
}
