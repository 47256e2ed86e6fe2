use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Optional hard limits on a commanded motor speed, rpm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    pub min: f64,
    pub max: f64,
}

impl SpeedLimits {
    pub fn new(min: f64, max: f64) -> Self {
        SpeedLimits { min, max }
    }

    /// Symmetric limits `[-max, max]`.
    pub fn symmetric(max: f64) -> Self {
        SpeedLimits { min: -max, max }
    }
}

/// Converts a rotational speed in rpm to rad/s.
pub fn rpm_to_rad_per_sec(rpm: f64) -> f64 {
    rpm * 2.0 * PI / 60.0
}

/// A drive motor with an instantaneous speed command. No electrical or inertial dynamics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motor {
    speed: f64,
    max_speed: f64,
    wheel_radius: f64,
    limits: Option<SpeedLimits>,
}

impl Motor {
    pub fn new(max_speed: f64, wheel_radius: f64) -> Self {
        Motor {
            speed: 0.0,
            max_speed,
            wheel_radius,
            limits: None,
        }
    }

    /// Clamp every future command to `limits`.
    pub fn with_speed_limits(mut self, limits: SpeedLimits) -> Self {
        self.limits = Some(limits);
        self.speed = self.limited(self.speed);
        self
    }

    /// Sets the commanded speed in rpm. Without limits the command is stored as given,
    /// including negative or over-max values.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = self.limited(speed);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    pub fn limits(&self) -> Option<SpeedLimits> {
        self.limits
    }

    /// Linear speed of the wheel contact point, m/s.
    pub fn linear_speed(&self) -> f64 {
        rpm_to_rad_per_sec(self.speed) * self.wheel_radius
    }

    fn limited(&self, speed: f64) -> f64 {
        match self.limits {
            // Never panics: a NaN bound is ignored, `max` wins over an inverted `min`
            Some(limits) => speed.max(limits.min).min(limits.max),
            None => speed,
        }
    }
}
