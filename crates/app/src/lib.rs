//! Line follower simulation
//!
//! Ties the robot model, the steering loop and a track raster into a tick-driven
//! simulation. A renderer or a headless host drives it with [`Simulation::step`].

pub mod config;
pub mod simulation;
pub mod track;

pub use config::{ConfigError, RunConfig, SensorConfig, SimConfig};
pub use simulation::{SensorSnapshot, SimStatus, Simulation, TerminationReason, TickReport};
