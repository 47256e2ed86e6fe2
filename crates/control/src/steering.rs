//! Line steering policy
//!
//! Turns sensor readings into a signed error, runs it through the PID law and splits the
//! correction across the two motors.

use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{Model, SensorGroup};

use crate::pid::{PidConfig, PidController};

/// Sum of `Left` readings minus the sum of `Right` readings.
pub fn line_error<I>(readings: I) -> f64
where
    I: IntoIterator<Item = (SensorGroup, f64)>,
{
    let (left, right) = readings
        .into_iter()
        .fold((0.0, 0.0), |(left, right), (group, reading)| match group {
            SensorGroup::Left => (left + reading, right),
            SensorGroup::Right => (left, right + reading),
        });
    left - right
}

/// Speed command for both motors, rpm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorCommand {
    pub left: f64,
    pub right: f64,
}

impl MotorCommand {
    /// Applies `output` around each motor's base speed: the left motor speeds up by
    /// `output`, the right slows down by it. No clamping.
    pub fn from_correction(output: f64, left_base: f64, right_base: f64) -> Self {
        MotorCommand {
            left: left_base + output,
            right: right_base - output,
        }
    }
}

/// Result of one steering update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringOutput {
    pub error: f64,
    pub correction: f64,
    pub command: MotorCommand,
}

/// PID steering around a fixed base speed per motor.
#[derive(Debug, Clone)]
pub struct LineSteering {
    pid: PidController,
}

impl LineSteering {
    pub fn new(config: PidConfig) -> Self {
        Self {
            pid: PidController::new(config),
        }
    }

    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    pub fn update<I>(
        &mut self,
        readings: I,
        dt: f64,
        left_base: f64,
        right_base: f64,
    ) -> SteeringOutput
    where
        I: IntoIterator<Item = (SensorGroup, f64)>,
    {
        let error = line_error(readings);
        let correction = self.pid.update(error, dt);
        let command = MotorCommand::from_correction(correction, left_base, right_base);

        debug!(
            "steering: error={:.3} correction={:.3} left={:.2} right={:.2}",
            error, correction, command.left, command.right
        );

        SteeringOutput {
            error,
            correction,
            command,
        }
    }
}

impl Model for LineSteering {
    fn reset(&mut self) {
        self.pid.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_error_left_minus_right() {
        let readings = vec![
            (SensorGroup::Left, 1.0),
            (SensorGroup::Left, 1.0),
            (SensorGroup::Left, 0.0),
            (SensorGroup::Right, 0.0),
            (SensorGroup::Right, 1.0),
            (SensorGroup::Right, 0.0),
        ];
        assert_eq!(line_error(readings), 1.0);
    }

    #[test]
    fn test_line_error_follows_tags_not_order() {
        let interleaved = vec![
            (SensorGroup::Right, 1.0),
            (SensorGroup::Left, 0.0),
            (SensorGroup::Right, 1.0),
            (SensorGroup::Left, 0.0),
        ];
        assert_eq!(line_error(interleaved), -2.0);
    }

    #[test]
    fn test_balanced_readings_give_zero_error() {
        let groups = SensorGroup::split_halves(8);
        let readings = groups.into_iter().map(|g| (g, 1.0));
        assert_eq!(line_error(readings), 0.0);
    }

    #[test]
    fn test_correction_split() {
        let command = MotorCommand::from_correction(40.0, 312.5, 312.5);
        assert_eq!(command.left, 352.5);
        assert_eq!(command.right, 272.5);
    }

    #[test]
    fn test_large_correction_is_not_clamped() {
        let command = MotorCommand::from_correction(1000.0, 312.5, 312.5);
        assert_eq!(command.left, 1312.5);
        assert_eq!(command.right, -687.5);
    }

    #[test]
    fn test_steering_update_zero_error_keeps_base_speed() {
        let mut steering = LineSteering::new(PidConfig::pid(50.0, 3.0, 0.01));
        let groups = SensorGroup::split_halves(4);
        let out = steering.update(groups.iter().map(|g| (*g, 1.0)), 0.02, 312.5, 312.5);

        assert_eq!(out.error, 0.0);
        assert_eq!(out.correction, 0.0);
        assert_eq!(out.command, MotorCommand { left: 312.5, right: 312.5 });
    }

    #[test]
    fn test_reset_clears_pid() {
        let mut steering = LineSteering::new(PidConfig::pi(1.0, 1.0));
        steering.update([(SensorGroup::Left, 1.0)], 0.5, 100.0, 100.0);
        assert!(steering.pid().integral() > 0.0);

        steering.reset();
        assert_eq!(steering.pid().integral(), 0.0);
    }
}
