//! Planar pose and frame transforms.
//!
//! Poses live in map coordinates. Angles are radians and are never normalized here;
//! every consumer goes through `sin`/`cos`, which are range-agnostic.

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// Robot position plus heading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, measured from the +x axis.
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose { x, y, heading }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Direction of the map's y axis.
///
/// `MathUp` is the usual right-handed frame. `ScreenDown` matches raster images whose rows
/// grow downward: a positive heading still turns the robot to its left on screen, so every
/// `sin` contribution to `y` flips sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisConvention {
    #[default]
    MathUp,
    ScreenDown,
}

impl AxisConvention {
    pub fn y_sign(self) -> f64 {
        match self {
            AxisConvention::MathUp => 1.0,
            AxisConvention::ScreenDown => -1.0,
        }
    }
}

/// Rotates `vector` counter-clockwise by `angle` radians.
pub fn rotate_vector(vector: Vector2<f64>, angle: f64) -> Vector2<f64> {
    Rotation2::new(angle) * vector
}

/// Map position of a point `distance` away from `pose`, at `angle` relative to its heading.
pub fn polar_to_map(pose: &Pose, distance: f64, angle: f64, axis: AxisConvention) -> Point2<f64> {
    let absolute_angle = pose.heading + angle;
    Point2::new(
        pose.x + distance * absolute_angle.cos(),
        pose.y + axis.y_sign() * distance * absolute_angle.sin(),
    )
}

/// Expresses a map point in the robot frame of `pose` as (forward, left).
pub fn map_to_local(pose: &Pose, point: &Point2<f64>, axis: AxisConvention) -> Vector2<f64> {
    let delta = Vector2::new(point.x - pose.x, axis.y_sign() * (point.y - pose.y));
    rotate_vector(delta, -pose.heading)
}
