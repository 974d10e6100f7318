pub mod ball;
pub mod bounce;
pub mod config;
pub mod delivery;
pub mod error;
pub mod swing;
pub mod trajectory;
pub mod world;

use pitchside_core::collaborators::TargetSource;
use pitchside_core::delivery::DeliveryEvent;

use ball::BallState;
use config::BowlingConfig;
use delivery::{Delivery, DeliveryParameters, DeliveryPhase};
use error::DeliveryError;
use trajectory::LaunchSolution;
use world::PitchWorld;

/// A delivery and the pitch it is bowled on, stepped once per tick by an
/// external driver.
#[derive(Debug, Clone)]
pub struct BowlingSim {
    delivery: Delivery,
    world: PitchWorld,
    ticks: u64,
}

impl BowlingSim {
    pub fn new(config: BowlingConfig, world: PitchWorld) -> Result<Self, DeliveryError> {
        let delivery = Delivery::new(config, world.release_point)?;
        Ok(Self {
            delivery,
            world,
            ticks: 0,
        })
    }

    pub fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    pub fn world(&self) -> &PitchWorld {
        &self.world
    }

    pub fn ball(&self) -> &BallState {
        self.delivery.ball()
    }

    pub fn phase(&self) -> DeliveryPhase {
        self.delivery.phase()
    }

    /// Ticks stepped since the current delivery started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start_delivery(
        &mut self,
        params: DeliveryParameters,
        target: &impl TargetSource,
    ) -> Result<LaunchSolution, DeliveryError> {
        let launch = self.delivery.start_delivery(params, target)?;
        self.ticks = 0;
        Ok(launch)
    }

    pub fn reset_ball(&mut self) {
        self.delivery.reset_ball();
        self.ticks = 0;
    }

    /// Advance one fixed step: scripted motion, gravity, contact detection,
    /// collision dispatch, then ground resolution.
    pub fn step(&mut self, dt: f32) -> Vec<DeliveryEvent> {
        if !self.delivery.ball().is_active {
            return Vec::new();
        }
        self.ticks += 1;

        let gravity = self.delivery.config().gravity;
        self.delivery.tick(dt);
        self.world.integrate(self.delivery.ball_mut(), gravity, dt);

        let contacts = self.world.detect_contacts(self.delivery.ball());
        if !contacts.is_empty() {
            self.world.settle_on_ground(self.delivery.ball_mut());
        }
        let events = self.delivery.handle_collisions(&contacts);

        self.world.resolve_ground(self.delivery.ball_mut());
        self.delivery.record_trail();
        events
    }
}
