use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pixel extent of the simulated map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapExtent {
    pub width: u32,
    pub height: u32,
}

impl Default for MapExtent {
    fn default() -> Self {
        MapExtent {
            width: 800,
            height: 600,
        }
    }
}

impl MapExtent {
    pub fn new(width: u32, height: u32) -> Self {
        MapExtent { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when `point` lies in `[0, width) x [0, height)`. NaN coordinates are outside.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= 0.0
            && point.x < self.width as f64
            && point.y >= 0.0
            && point.y < self.height as f64
    }
}

/// Boundary predicate applied to the robot and every sensor once per tick.
pub fn is_out_of_bounds(point: &Point2<f64>, extent: &MapExtent) -> bool {
    !extent.contains(point)
}
