//! PID (Proportional-Integral-Derivative) Controller
//!
//! Error-driven control law. Anti-windup and output saturation are available but off
//! by default, so the plain law `kp*e + ki*∫e + kd*de/dt` is what runs unless asked.

use serde::{Deserialize, Serialize};
use simcore::Model;

/// Configuration for a PID controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Maximum integral accumulator magnitude (anti-windup). Unbounded when `None`.
    pub i_max: Option<f64>,
    /// Minimum output value
    pub output_min: Option<f64>,
    /// Maximum output value
    pub output_max: Option<f64>,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            i_max: None,
            output_min: None,
            output_max: None,
        }
    }
}

impl PidConfig {
    /// Create a P-only controller
    pub fn p(kp: f64) -> Self {
        Self { kp, ..Default::default() }
    }

    /// Create a PI controller
    pub fn pi(kp: f64, ki: f64) -> Self {
        Self { kp, ki, ..Default::default() }
    }

    /// Create a PID controller
    pub fn pid(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, ..Default::default() }
    }

    /// Set output limits
    pub fn with_limits(mut self, min: f64, max: f64) -> Self {
        self.output_min = Some(min);
        self.output_max = Some(max);
        self
    }

    /// Set integral anti-windup limit
    pub fn with_i_max(mut self, i_max: f64) -> Self {
        self.i_max = Some(i_max);
        self
    }

    /// One evaluation of the control law from `state`. Returns the output and the next state.
    ///
    /// With `dt <= 0` no time has elapsed: the integral and the remembered error are kept
    /// and the derivative term is zero. A term whose gain is zero never contributes, and an
    /// integral or derivative that overflows is dropped for this step.
    pub fn evaluate(&self, state: PidState, error: f64, dt: f64) -> (f64, PidState) {
        let mut next = state;
        let mut derivative = 0.0;

        if dt > 0.0 {
            let integral = state.integral + error * dt;
            if integral.is_finite() {
                next.integral = match self.i_max {
                    Some(i_max) => limit(integral, -i_max.abs(), i_max.abs()),
                    None => integral,
                };
            }
            derivative = (error - state.last_error) / dt;
            next.last_error = error;
        }

        let mut output = self.kp * error;
        if self.ki != 0.0 {
            output += finite_or_zero(self.ki * next.integral);
        }
        if self.kd != 0.0 {
            output += finite_or_zero(self.kd * derivative);
        }
        (self.saturate(output), next)
    }

    fn saturate(&self, output: f64) -> f64 {
        let output = match self.output_max {
            Some(max) => output.min(max),
            None => output,
        };
        match self.output_min {
            Some(min) => output.max(min),
            None => output,
        }
    }
}

/// Clamp that never panics: a NaN bound is ignored and `max` wins over an inverted `min`.
fn limit(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn finite_or_zero(term: f64) -> f64 {
    if term.is_finite() { term } else { 0.0 }
}

/// Carried controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    pub integral: f64,
    pub last_error: f64,
}

/// PID Controller with state
#[derive(Debug, Clone)]
pub struct PidController {
    config: PidConfig,
    state: PidState,
    last_output: f64,
}

impl PidController {
    /// Create a new controller with the given configuration
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            state: PidState::default(),
            last_output: 0.0,
        }
    }

    /// Update the controller with a new error sample and return the control output
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        let (output, state) = self.config.evaluate(self.state, error, dt);
        self.state = state;
        self.last_output = output;
        output
    }

    /// Get the current integral accumulator value
    pub fn integral(&self) -> f64 {
        self.state.integral
    }

    pub fn last_error(&self) -> f64 {
        self.state.last_error
    }

    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    pub fn state(&self) -> PidState {
        self.state
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PidConfig {
        &self.config
    }
}

impl Model for PidController {
    /// Reset the controller state (integral and remembered error)
    fn reset(&mut self) {
        self.state = PidState::default();
        self.last_output = 0.0;
    }
}
