use pitchside_bowling::BowlingSim;
use pitchside_bowling::config::BowlingConfig;
use pitchside_bowling::delivery::{DeliveryParameters, DeliveryPhase};
use pitchside_bowling::error::DeliveryError;
use pitchside_bowling::trajectory::LaunchSolution;
use pitchside_bowling::world::PitchWorld;
use pitchside_core::collaborators::PowerSource;
use pitchside_core::delivery::{BowlingMode, DeliveryEvent, Side};
use pitchside_core::math::Vec3;

use crate::marker::{LandingMarker, MarkerConfig};
use crate::meter::{MeterConfig, PowerMeter};

/// Owns the simulation and its collaborators, and re-arms them when a
/// delivery ends.
#[derive(Debug, Clone)]
pub struct BowlingSession {
    sim: BowlingSim,
    meter: PowerMeter,
    marker: LandingMarker,
    mode: BowlingMode,
    side: Side,
    controls_enabled: bool,
    trail_enabled: bool,
}

impl BowlingSession {
    pub fn new(
        bowling: BowlingConfig,
        world: PitchWorld,
        meter: MeterConfig,
        marker: MarkerConfig,
    ) -> Result<Self, DeliveryError> {
        meter.validate()?;
        marker.validate()?;
        let marker = LandingMarker::new(marker, world.target_height());
        let sim = BowlingSim::new(bowling, world)?;
        Ok(Self {
            sim,
            meter: PowerMeter::new(meter),
            marker,
            mode: BowlingMode::default(),
            side: Side::default(),
            controls_enabled: true,
            trail_enabled: true,
        })
    }

    pub fn sim(&self) -> &BowlingSim {
        &self.sim
    }

    pub fn meter(&self) -> &PowerMeter {
        &self.meter
    }

    pub fn meter_mut(&mut self) -> &mut PowerMeter {
        &mut self.meter
    }

    pub fn marker(&self) -> &LandingMarker {
        &self.marker
    }

    pub fn marker_mut(&mut self) -> &mut LandingMarker {
        &mut self.marker
    }

    pub fn mode(&self) -> BowlingMode {
        self.mode
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Mode, side and bowl controls are only live between deliveries.
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Returns whether the selection was applied.
    pub fn select_mode(&mut self, mode: BowlingMode) -> bool {
        if !self.controls_enabled {
            tracing::debug!(?mode, "Mode change ignored during delivery");
            return false;
        }
        self.mode = mode;
        true
    }

    /// Returns whether the side was flipped.
    pub fn toggle_side(&mut self) -> bool {
        if !self.controls_enabled {
            tracing::debug!("Side change ignored during delivery");
            return false;
        }
        self.side = self.side.flipped();
        true
    }

    pub fn toggle_trail(&mut self) -> bool {
        self.trail_enabled = !self.trail_enabled;
        self.trail_enabled
    }

    /// Ball path history, or `None` while the trail is switched off.
    pub fn trail(&self) -> Option<&[Vec3]> {
        self.trail_enabled.then(|| self.sim.ball().trail.as_slice())
    }

    /// Lock the meter and marker and launch a delivery with the current
    /// selection. A rejected launch unlocks them again.
    pub fn bowl(&mut self) -> Result<LaunchSolution, DeliveryError> {
        if !self.controls_enabled {
            return Err(DeliveryError::NotIdle {
                phase: self.sim.phase(),
            });
        }
        self.meter.lock();
        self.marker.lock();
        self.controls_enabled = false;

        let params = DeliveryParameters::new(self.mode, self.meter.power(), self.side);
        match self.sim.start_delivery(params, &self.marker) {
            Ok(launch) => {
                tracing::info!(
                    mode = ?params.mode,
                    side = ?params.side,
                    power = params.power,
                    target = ?self.marker.position(),
                    "Bowled"
                );
                Ok(launch)
            },
            Err(e) => {
                tracing::warn!(error = %e, "Delivery rejected");
                self.meter.unlock();
                self.marker.unlock();
                self.controls_enabled = true;
                Err(e)
            },
        }
    }

    /// Advance one tick. The meter only sweeps between deliveries; a
    /// delivery ending resets every collaborator.
    pub fn step(&mut self, dt: f32) -> Vec<DeliveryEvent> {
        if self.controls_enabled {
            self.meter.update(dt);
        }
        let events = self.sim.step(dt);
        if events
            .iter()
            .any(|e| matches!(e, DeliveryEvent::Ended { .. }))
        {
            self.reset_game();
        }
        events
    }

    /// Reset ball, meter and marker and re-enable the controls. Safe to call
    /// at any time.
    pub fn reset_game(&mut self) {
        self.meter.reset();
        self.marker.reset();
        self.sim.reset_ball();
        self.controls_enabled = true;
    }

    pub fn phase(&self) -> DeliveryPhase {
        self.sim.phase()
    }
}
