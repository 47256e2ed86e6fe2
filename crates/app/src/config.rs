//! Simulation configuration
//!
//! One immutable record per simulation. Loaded from JSON; every section falls back to
//! defaults that reproduce the reference robot (170 mm track, 16 mm wheels, 312.5 rpm
//! base speed, eight sensors, kp = 50, ki = 3, kd = 0.01).

use std::path::Path;

use control::PidConfig;
use mechanics::{LineClassifier, RobotConfig, SensorMount, SensorOffset};
use serde::{Deserialize, Serialize};
use simcore::{MapExtent, Pose, Rgb, SensorGroup};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} lower limit {min} exceeds upper limit {max}")]
    InvalidLimits { field: &'static str, min: f64, max: f64 },
    #[error("map extent {width}x{height} is empty")]
    EmptyMap { width: u32, height: u32 },
    #[error("at least one sensor is required")]
    NoSensors,
    #[error("sensor {index} has an invalid offset (distance {distance}, angle {angle})")]
    InvalidSensor { index: usize, distance: f64, angle: f64 },
    #[error("{0} untagged sensors cannot be split into equal left and right halves")]
    OddSensorCount(usize),
    #[error("{tagged} of {total} sensors carry a group; tag all of them or none")]
    MixedGroups { tagged: usize, total: usize },
}

/// One sensor as calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub distance: f64,
    pub angle: f64,
    /// Explicit side. When every sensor omits it, the first half is `Left`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<SensorGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl SensorConfig {
    pub fn new(offset: SensorOffset) -> Self {
        SensorConfig {
            distance: offset.distance,
            angle: offset.angle,
            group: None,
            color: None,
        }
    }

    pub fn with_group(mut self, group: SensorGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn offset(&self) -> SensorOffset {
        SensorOffset::new(self.distance, self.angle)
    }
}

/// Pacing for the headless host loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Fixed step handed to the simulation, s.
    pub dt: f64,
    pub max_ticks: u64,
    /// Log telemetry every this many ticks. 0 disables it.
    pub report_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            dt: 0.02,
            max_ticks: 5_000,
            report_every: 50,
        }
    }
}

const SENSOR_COLORS: [Rgb; 10] = [
    Rgb([255, 0, 0]),
    Rgb([0, 255, 0]),
    Rgb([0, 0, 255]),
    Rgb([255, 255, 0]),
    Rgb([0, 255, 255]),
    Rgb([255, 0, 255]),
    Rgb([255, 255, 255]),
    Rgb([128, 0, 0]),
    Rgb([0, 128, 0]),
    Rgb([0, 0, 128]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub robot: RobotConfig,
    pub start: Pose,
    pub sensors: Vec<SensorConfig>,
    pub map: MapExtent,
    pub pid: PidConfig,
    pub classifier: LineClassifier,
    pub run: RunConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        // Eight sensors in a bar 40 px ahead of the axle, listed left to right
        let sensors = [21.0, 15.0, 9.0, 3.0, -3.0, -9.0, -15.0, -21.0]
            .iter()
            .zip(SENSOR_COLORS)
            .map(|(left, color)| SensorConfig {
                color: Some(color),
                ..SensorConfig::new(SensorOffset::from_cartesian(40.0, *left))
            })
            .collect();

        SimConfig {
            robot: RobotConfig::default(),
            start: Pose::new(600.0, 300.0, std::f64::consts::FRAC_PI_2),
            sensors,
            map: MapExtent::default(),
            pid: PidConfig::pid(50.0, 3.0, 0.01),
            classifier: LineClassifier::default(),
            run: RunConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects records the per-tick path does not defend against.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let robot = &self.robot;
        positive("robot.width", robot.width)?;
        positive("robot.wheel_radius", robot.wheel_radius)?;
        positive("robot.pixels_per_meter", robot.pixels_per_meter)?;
        finite("robot.initial_motor_speed", robot.initial_motor_speed)?;
        finite("robot.max_motor_speed", robot.max_motor_speed)?;
        if let Some(limits) = robot.speed_limits {
            ordered("robot.speed_limits", limits.min, limits.max)?;
        }

        finite("start.x", self.start.x)?;
        finite("start.y", self.start.y)?;
        finite("start.heading", self.start.heading)?;

        if self.map.is_empty() {
            return Err(ConfigError::EmptyMap {
                width: self.map.width,
                height: self.map.height,
            });
        }

        self.validate_sensors()?;

        let pid = &self.pid;
        finite("pid.kp", pid.kp)?;
        finite("pid.ki", pid.ki)?;
        finite("pid.kd", pid.kd)?;
        if let Some(i_max) = pid.i_max {
            ordered("pid.i_max", 0.0, i_max)?;
        }
        if let (Some(min), Some(max)) = (pid.output_min, pid.output_max) {
            ordered("pid.output", min, max)?;
        }

        finite("classifier.threshold", self.classifier.threshold)?;
        if !(self.run.dt >= 0.0 && self.run.dt.is_finite()) {
            return Err(ConfigError::NotFinite {
                field: "run.dt",
                value: self.run.dt,
            });
        }
        Ok(())
    }

    /// Sensor mounts with every group resolved.
    pub fn mounts(&self) -> Vec<SensorMount> {
        let halves = SensorGroup::split_halves(self.sensors.len());
        self.sensors
            .iter()
            .zip(halves)
            .map(|(sensor, default_group)| SensorMount {
                offset: sensor.offset(),
                group: sensor.group.unwrap_or(default_group),
                color_tag: sensor.color,
            })
            .collect()
    }

    fn validate_sensors(&self) -> Result<(), ConfigError> {
        let total = self.sensors.len();
        if total == 0 {
            return Err(ConfigError::NoSensors);
        }

        for (index, sensor) in self.sensors.iter().enumerate() {
            let valid = sensor.distance.is_finite()
                && sensor.distance >= 0.0
                && sensor.angle.is_finite();
            if !valid {
                return Err(ConfigError::InvalidSensor {
                    index,
                    distance: sensor.distance,
                    angle: sensor.angle,
                });
            }
        }

        let tagged = self.sensors.iter().filter(|s| s.group.is_some()).count();
        match tagged {
            0 if total % 2 != 0 => Err(ConfigError::OddSensorCount(total)),
            0 => Ok(()),
            t if t == total => Ok(()),
            _ => Err(ConfigError::MixedGroups { tagged, total }),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidLimits { field, min, max })
    }
}
