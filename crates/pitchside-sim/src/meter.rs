use serde::{Deserialize, Serialize};

use pitchside_bowling::error::DeliveryError;
use pitchside_core::collaborators::PowerSource;

/// Oscillation parameters for the power bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Bar travel speed (units/s).
    pub speed: f32,
    pub min: f32,
    pub max: f32,
    /// Bar position after a reset.
    pub start: f32,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            speed: 300.0,
            min: -275.0,
            max: 275.0,
            start: 0.0,
        }
    }
}

impl MeterConfig {
    /// Reject limits the bar cannot sweep between.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        for (name, value) in [
            ("meter.speed", self.speed),
            ("meter.min", self.min),
            ("meter.max", self.max),
            ("meter.start", self.start),
        ] {
            if !value.is_finite() {
                return Err(DeliveryError::NonFinite(name));
            }
        }
        if self.speed <= 0.0 {
            return Err(DeliveryError::InvalidConfig(format!(
                "meter.speed must be positive, got {}",
                self.speed
            )));
        }
        if self.min > self.max {
            return Err(DeliveryError::InvalidConfig(format!(
                "meter.min ({}) is above meter.max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn max_distance(&self) -> f32 {
        self.min.abs().max(self.max.abs())
    }
}

/// A bar that sweeps between two limits; power peaks when it is centred.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerMeter {
    config: MeterConfig,
    position: f32,
    direction: f32,
    locked: bool,
}

impl PowerMeter {
    pub fn new(config: MeterConfig) -> Self {
        let position = config.start;
        Self {
            config,
            position,
            direction: 1.0,
            locked: false,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Move the bar, bouncing off the limits. Frozen while locked.
    pub fn update(&mut self, dt: f32) {
        if self.locked {
            return;
        }
        self.position += self.config.speed * self.direction * dt;
        if self.position >= self.config.max {
            self.position = self.config.max;
            self.direction = -1.0;
        } else if self.position <= self.config.min {
            self.position = self.config.min;
            self.direction = 1.0;
        }
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Unlock and return the bar to its start position, moving up.
    pub fn reset(&mut self) {
        self.locked = false;
        self.position = self.config.start;
        self.direction = 1.0;
    }

    /// Park the bar where it reads `power`, for scripted deliveries.
    pub fn seek_power(&mut self, power: f32) {
        let power = power.clamp(0.0, 1.0);
        self.position = ((1.0 - power) * self.config.max_distance())
            .min(self.config.max)
            .max(self.config.min);
    }
}

impl PowerSource for PowerMeter {
    fn power(&self) -> f32 {
        let max_distance = self.config.max_distance();
        if max_distance <= 0.0 {
            return 1.0;
        }
        1.0 - (self.position.abs() / max_distance).clamp(0.0, 1.0)
    }
}
