use serde::{Deserialize, Serialize};

// Control Traits
/// Side of the line error sum a sensor contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorGroup {
    Left,
    Right,
}

impl SensorGroup {
    /// Reference split for `count` sensors in creation order: the first half is `Left`,
    /// the remainder `Right`.
    pub fn split_halves(count: usize) -> Vec<SensorGroup> {
        let half = count / 2;
        (0..count)
            .map(|i| if i < half { SensorGroup::Left } else { SensorGroup::Right })
            .collect()
    }

    /// Sign applied to a reading of this group in the error sum.
    pub fn sign(self) -> f64 {
        match self {
            SensorGroup::Left => 1.0,
            SensorGroup::Right => -1.0,
        }
    }
}

// Mechanical Traits
/// Body-frame velocity of a planar robot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist {
    /// Forward speed along the heading, in map units per second.
    pub linear: f64,
    /// Yaw rate, rad/s. Positive turns toward the robot's left.
    pub angular: f64,
}

// General Traits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

pub trait Model {
    fn reset(&mut self);
}
