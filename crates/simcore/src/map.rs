//! Read-only track surface sampled by the line sensors.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bounds::MapExtent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb([r, g, b])
    }

    /// Grayscale value as the plain channel mean, in `[0, 255]`.
    pub fn luminance(&self) -> f64 {
        let [r, g, b] = self.0;
        (r as f64 + g as f64 + b as f64) / 3.0
    }
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("raster holds {actual} pixels but a {width}x{height} extent needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Anything the sensors can sample. Coordinates are map pixels.
pub trait TrackSurface {
    fn extent(&self) -> MapExtent;

    /// Color of the pixel at `column`, `row`, or `None` outside the raster.
    fn pixel(&self, column: u32, row: u32) -> Option<Rgb>;

    /// Color under a continuous map position. The position is floored to its pixel.
    fn sample(&self, point: &Point2<f64>) -> Option<Rgb> {
        if !self.extent().contains(point) {
            return None;
        }
        self.pixel(point.x.floor() as u32, point.y.floor() as u32)
    }
}

/// Row-major in-memory raster.
#[derive(Debug, Clone)]
pub struct RasterMap {
    extent: MapExtent,
    pixels: Vec<Rgb>,
}

impl RasterMap {
    pub fn filled(extent: MapExtent, color: Rgb) -> Self {
        RasterMap {
            extent,
            pixels: vec![color; extent.pixel_count()],
        }
    }

    pub fn from_pixels(extent: MapExtent, pixels: Vec<Rgb>) -> Result<Self, MapError> {
        if pixels.len() != extent.pixel_count() {
            return Err(MapError::SizeMismatch {
                width: extent.width,
                height: extent.height,
                expected: extent.pixel_count(),
                actual: pixels.len(),
            });
        }
        Ok(RasterMap { extent, pixels })
    }

    /// Returns false when the pixel is outside the raster.
    pub fn set_pixel(&mut self, column: u32, row: u32, color: Rgb) -> bool {
        match self.index(column, row) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Paints every pixel whose center satisfies `mask`.
    pub fn paint<F>(&mut self, color: Rgb, mask: F)
    where
        F: Fn(f64, f64) -> bool,
    {
        let width = self.extent.width as usize;
        for (i, pixel) in self.pixels.iter_mut().enumerate() {
            let column = (i % width) as f64 + 0.5;
            let row = (i / width) as f64 + 0.5;
            if mask(column, row) {
                *pixel = color;
            }
        }
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        if column >= self.extent.width || row >= self.extent.height {
            return None;
        }
        Some(row as usize * self.extent.width as usize + column as usize)
    }
}

impl TrackSurface for RasterMap {
    fn extent(&self) -> MapExtent {
        self.extent
    }

    fn pixel(&self, column: u32, row: u32) -> Option<Rgb> {
        self.index(column, row).map(|i| self.pixels[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_is_channel_mean() {
        assert!((Rgb::new(30, 60, 90).luminance() - 60.0).abs() < 1e-12);
        assert!((Rgb::WHITE.luminance() - 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_floors_position() {
        let mut map = RasterMap::filled(MapExtent::new(4, 3), Rgb::WHITE);
        assert!(map.set_pixel(2, 1, Rgb::BLACK));

        assert_eq!(map.sample(&Point2::new(2.99, 1.01)), Some(Rgb::BLACK));
        assert_eq!(map.sample(&Point2::new(3.0, 1.5)), Some(Rgb::WHITE));
    }

    #[test]
    fn test_sample_outside_extent_is_none() {
        let map = RasterMap::filled(MapExtent::new(4, 3), Rgb::WHITE);
        assert_eq!(map.sample(&Point2::new(-0.5, 1.0)), None);
        assert_eq!(map.sample(&Point2::new(4.0, 1.0)), None);
        assert_eq!(map.sample(&Point2::new(1.0, 3.0)), None);
        assert_eq!(map.pixel(4, 0), None);
    }

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        let result = RasterMap::from_pixels(MapExtent::new(2, 2), vec![Rgb::WHITE; 3]);
        assert!(matches!(
            result,
            Err(MapError::SizeMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_paint_uses_pixel_centers() {
        let mut map = RasterMap::filled(MapExtent::new(10, 10), Rgb::WHITE);
        map.paint(Rgb::BLACK, |_, y| (y - 5.0).abs() < 1.0);

        assert_eq!(map.pixel(0, 4), Some(Rgb::BLACK));
        assert_eq!(map.pixel(9, 5), Some(Rgb::BLACK));
        assert_eq!(map.pixel(0, 3), Some(Rgb::WHITE));
        assert_eq!(map.pixel(0, 6), Some(Rgb::WHITE));
    }

    #[test]
    fn test_set_pixel_outside_is_rejected() {
        let mut map = RasterMap::filled(MapExtent::new(2, 2), Rgb::WHITE);
        assert!(!map.set_pixel(2, 0, Rgb::BLACK));
    }
}
