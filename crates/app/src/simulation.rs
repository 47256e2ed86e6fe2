//! Tick-driven line follower simulation
//!
//! Each [`Simulation::step`] runs one control tick in a fixed order:
//! 1. sample every sensor at its current position
//! 2. compute the line error from the readings
//! 3. run the PID law over the host-supplied `dt`
//! 4. set both motors to their base speed plus or minus the correction
//! 5. integrate the pose over `dt`
//! 6. re-place the sensors against the new pose
//! 7. stop the run if the robot or any sensor left the map
//!
//! Once stopped the simulation is absorbing: further steps change nothing.

use std::fmt;

use control::{LineSteering, PidController, SteeringOutput};
use log::{debug, info, warn};
use mechanics::Robot;
use serde::{Deserialize, Serialize};
use simcore::{Model, Pose, SensorGroup, SimContext, TrackSurface};

use crate::config::{ConfigError, SimConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    OutOfBounds,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::OutOfBounds => "out_of_bounds",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum SimStatus {
    Running,
    Terminated(TerminationReason),
}

impl SimStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, SimStatus::Running)
    }

    pub fn is_terminated(&self) -> bool {
        !self.is_running()
    }
}

/// One sensor as seen at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub x: f64,
    pub y: f64,
    pub group: SensorGroup,
    pub reading: f64,
}

/// Telemetry for a renderer or a log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    /// Simulated time, s.
    pub t: f64,
    pub pose: Pose,
    pub sensors: Vec<SensorSnapshot>,
    pub error: f64,
    pub correction: f64,
    pub left_speed: f64,
    pub right_speed: f64,
    pub status: SimStatus,
}

/// A robot, its steering loop and the run status. Instances share nothing.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    robot: Robot,
    steering: LineSteering,
    status: SimStatus,
    tick: u64,
    t: f64,
    last_output: Option<SteeringOutput>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let robot = Robot::new(config.robot, config.start, &config.mounts());
        let steering = LineSteering::new(config.pid);

        info!(
            "simulation ready: {}x{} map, {} sensors, kp={} ki={} kd={}",
            config.map.width,
            config.map.height,
            config.sensors.len(),
            config.pid.kp,
            config.pid.ki,
            config.pid.kd
        );

        Ok(Simulation {
            config,
            robot,
            steering,
            status: SimStatus::Running,
            tick: 0,
            t: 0.0,
            last_output: None,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn pid(&self) -> &PidController {
        self.steering.pid()
    }

    pub fn status(&self) -> SimStatus {
        self.status
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> f64 {
        self.t
    }

    /// Runs one control tick over `dt` seconds and reports the resulting state.
    ///
    /// `dt == 0` is a no-op for the pose and the PID state. Negative or non-finite
    /// values are treated as zero.
    pub fn step<S: TrackSurface + ?Sized>(&mut self, surface: &S, dt: f64) -> TickReport {
        if self.status.is_terminated() {
            return self.report();
        }

        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            debug!("ignoring invalid dt {dt}");
            0.0
        };

        if let Err(off) = self.robot.read_sensors(surface, &self.config.classifier) {
            warn!("{off} at tick {}; stopping", self.tick);
            self.terminate();
            return self.report();
        }

        let left_base = self.robot.left_motor().max_speed();
        let right_base = self.robot.right_motor().max_speed();
        let output = self
            .steering
            .update(self.robot.readings(), dt, left_base, right_base);
        self.robot.set_motor_speeds(output.command.left, output.command.right);

        self.robot.advance(&SimContext { dt, t: self.t });
        self.t += dt;
        self.tick += 1;
        self.last_output = Some(output);

        if self.robot.is_out_of_bounds(&self.config.map) {
            let pose = self.robot.pose();
            warn!(
                "robot left the map at tick {} ({:.2}, {:.2}); stopping",
                self.tick, pose.x, pose.y
            );
            self.terminate();
        }

        self.report()
    }

    pub fn report(&self) -> TickReport {
        let sensors = self
            .robot
            .sensors()
            .iter()
            .map(|s| SensorSnapshot {
                x: s.position().x,
                y: s.position().y,
                group: s.group(),
                reading: s.reading(),
            })
            .collect();
        let (error, correction) = self
            .last_output
            .map_or((0.0, 0.0), |out| (out.error, out.correction));

        TickReport {
            tick: self.tick,
            t: self.t,
            pose: self.robot.pose(),
            sensors,
            error,
            correction,
            left_speed: self.robot.left_motor().speed(),
            right_speed: self.robot.right_motor().speed(),
            status: self.status,
        }
    }

    fn terminate(&mut self) {
        self.status = SimStatus::Terminated(TerminationReason::OutOfBounds);
    }
}

impl Model for Simulation {
    fn reset(&mut self) {
        self.robot.reset();
        self.steering.reset();
        self.status = SimStatus::Running;
        self.tick = 0;
        self.t = 0.0;
        self.last_output = None;
        info!("simulation reset to start pose");
    }
}
