//! Control systems for the line follower
//!
//! This crate provides:
//! - A PID controller with optional anti-windup and output saturation
//! - The line steering policy: sensor error, correction, motor speed split

pub mod pid;
pub mod steering;

pub use pid::*;
pub use steering::*;
