use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{
    AxisConvention, ExplicitEuler, MapExtent, Model, Pose, Rgb, SensorGroup, SimContext,
    TrackSurface, Twist, is_out_of_bounds,
};

use crate::drive::DifferentialDrive;
use crate::motor::{Motor, SpeedLimits};
use crate::sensor::{LineClassifier, LineSensor, OffMap, SensorOffset};

/// Physical constants of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Distance between the wheel contact points, m.
    pub width: f64,
    /// Wheel radius, m. Shared by both motors.
    pub wheel_radius: f64,
    /// Speed both motors hold before the first control tick, rpm.
    pub initial_motor_speed: f64,
    /// Base speed the steering correction is applied around, rpm.
    pub max_motor_speed: f64,
    /// Map pixels per meter of travel.
    pub pixels_per_meter: f64,
    pub axis: AxisConvention,
    /// Clamp for commanded motor speeds. Unclamped when `None`.
    pub speed_limits: Option<SpeedLimits>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            width: 0.17,
            wheel_radius: 0.016,
            initial_motor_speed: 150.0,
            max_motor_speed: 312.5,
            pixels_per_meter: 1.0,
            axis: AxisConvention::MathUp,
            speed_limits: None,
        }
    }
}

/// Where and how a sensor is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorMount {
    pub offset: SensorOffset,
    pub group: SensorGroup,
    pub color_tag: Option<Rgb>,
}

/// Differential-drive robot: pose, two motors and an ordered sensor array.
///
/// The pose and the sensor positions only change through [`Robot::advance`] and
/// [`Model::reset`], which keep them in step.
#[derive(Debug, Clone)]
pub struct Robot {
    config: RobotConfig,
    start: Pose,
    pose: Pose,
    drive: DifferentialDrive,
    integrator: ExplicitEuler,
    left_motor: Motor,
    right_motor: Motor,
    sensors: Vec<LineSensor>,
}

impl Robot {
    pub fn new(config: RobotConfig, start: Pose, mounts: &[SensorMount]) -> Self {
        let mut motor = Motor::new(config.max_motor_speed, config.wheel_radius);
        if let Some(limits) = config.speed_limits {
            motor = motor.with_speed_limits(limits);
        }
        motor.set_speed(config.initial_motor_speed);

        let sensors = mounts
            .iter()
            .map(|m| {
                LineSensor::new(m.offset, m.group, &start, config.axis).with_color_tag(m.color_tag)
            })
            .collect::<Vec<_>>();

        debug!(
            "robot placed at ({:.2}, {:.2}, {:.3} rad) with {} sensors",
            start.x,
            start.y,
            start.heading,
            sensors.len()
        );

        Robot {
            config,
            start,
            pose: start,
            drive: DifferentialDrive::new(config.width, config.pixels_per_meter),
            integrator: ExplicitEuler::new(config.axis),
            left_motor: motor,
            right_motor: motor,
            sensors,
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn width(&self) -> f64 {
        self.config.width
    }

    pub fn left_motor(&self) -> &Motor {
        &self.left_motor
    }

    pub fn right_motor(&self) -> &Motor {
        &self.right_motor
    }

    pub fn sensors(&self) -> &[LineSensor] {
        &self.sensors
    }

    /// (group, reading) of every sensor in creation order.
    pub fn readings(&self) -> impl Iterator<Item = (SensorGroup, f64)> + '_ {
        self.sensors.iter().map(|s| (s.group(), s.reading()))
    }

    pub fn set_motor_speeds(&mut self, left: f64, right: f64) {
        self.left_motor.set_speed(left);
        self.right_motor.set_speed(right);
    }

    pub fn move_forward(&mut self) {
        self.set_motor_speeds(self.left_motor.max_speed(), self.right_motor.max_speed());
    }

    pub fn move_backward(&mut self) {
        self.set_motor_speeds(-self.left_motor.max_speed(), -self.right_motor.max_speed());
    }

    pub fn turn_left(&mut self) {
        self.set_motor_speeds(-self.left_motor.max_speed(), self.right_motor.max_speed());
    }

    pub fn turn_right(&mut self) {
        self.set_motor_speeds(self.left_motor.max_speed(), -self.right_motor.max_speed());
    }

    pub fn stop(&mut self) {
        self.set_motor_speeds(0.0, 0.0);
    }

    pub fn twist(&self) -> Twist {
        self.drive.twist(&self.left_motor, &self.right_motor)
    }

    /// Integrates the pose over `ctx.dt` at the current motor commands, then re-places
    /// every sensor against the new pose.
    pub fn advance(&mut self, ctx: &SimContext) {
        self.pose = self
            .drive
            .integrate(&self.integrator, ctx, self.pose, &self.left_motor, &self.right_motor);
        self.place_sensors();
    }

    /// Samples every sensor. Nothing is recorded unless all of them are on the raster.
    pub fn read_sensors<S: TrackSurface + ?Sized>(
        &mut self,
        surface: &S,
        classifier: &LineClassifier,
    ) -> Result<(), OffMap> {
        let colors = self
            .sensors
            .iter()
            .enumerate()
            .map(|(index, sensor)| sensor.sample(surface).ok_or(OffMap { index }))
            .collect::<Result<Vec<_>, _>>()?;

        for (sensor, color) in self.sensors.iter_mut().zip(colors) {
            sensor.record(color, classifier);
        }
        Ok(())
    }

    /// True when the robot origin or any sensor lies outside `extent`.
    pub fn is_out_of_bounds(&self, extent: &MapExtent) -> bool {
        is_out_of_bounds(&self.pose.position(), extent)
            || self.sensors.iter().any(|s| is_out_of_bounds(&s.position(), extent))
    }

    fn place_sensors(&mut self) {
        let (pose, axis) = (self.pose, self.config.axis);
        for sensor in &mut self.sensors {
            sensor.place(&pose, axis);
        }
    }
}

impl Model for Robot {
    fn reset(&mut self) {
        self.pose = self.start;
        let speed = self.config.initial_motor_speed;
        self.set_motor_speeds(speed, speed);
        self.place_sensors();
    }
}
