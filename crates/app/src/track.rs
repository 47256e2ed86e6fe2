//! Synthetic tracks painted onto an in-memory raster.

use nalgebra::Point2;
use simcore::{MapExtent, RasterMap, Rgb};

/// Horizontal band of `line` color centered on `row`.
pub fn straight_band(
    extent: MapExtent,
    row: f64,
    half_width: f64,
    line: Rgb,
    background: Rgb,
) -> RasterMap {
    let mut map = RasterMap::filled(extent, background);
    map.paint(line, |_, y| (y - row).abs() < half_width);
    map
}

/// Circular line of `radius` around `center`.
pub fn ring(
    extent: MapExtent,
    center: Point2<f64>,
    radius: f64,
    half_width: f64,
    line: Rgb,
    background: Rgb,
) -> RasterMap {
    let mut map = RasterMap::filled(extent, background);
    map.paint(line, |x, y| {
        let r = (Point2::new(x, y) - center).norm();
        (r - radius).abs() < half_width
    });
    map
}

/// Dark ring centered on the map that passes through `start`.
///
/// Falls back to a third of the shorter side when `start` sits on the center.
pub fn ring_through(extent: MapExtent, start: Point2<f64>, half_width: f64) -> RasterMap {
    let center = Point2::new(extent.width as f64 / 2.0, extent.height as f64 / 2.0);
    let mut radius = (start - center).norm();
    if radius < half_width {
        radius = extent.width.min(extent.height) as f64 / 3.0;
    }
    ring(extent, center, radius, half_width, Rgb::BLACK, Rgb::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcore::TrackSurface;

    #[test]
    fn test_straight_band() {
        let map = straight_band(MapExtent::new(50, 40), 20.0, 3.0, Rgb::BLACK, Rgb::WHITE);
        assert_eq!(map.pixel(10, 20), Some(Rgb::BLACK));
        assert_eq!(map.pixel(49, 17), Some(Rgb::BLACK));
        assert_eq!(map.pixel(10, 16), Some(Rgb::WHITE));
        assert_eq!(map.pixel(10, 23), Some(Rgb::WHITE));
    }

    #[test]
    fn test_ring_through_start() {
        let extent = MapExtent::new(200, 100);
        let map = ring_through(extent, Point2::new(140.0, 50.0), 4.0);

        assert_eq!(map.sample(&Point2::new(140.2, 50.2)), Some(Rgb::BLACK));
        assert_eq!(map.sample(&Point2::new(60.2, 50.2)), Some(Rgb::BLACK));
        assert_eq!(map.sample(&Point2::new(100.5, 50.5)), Some(Rgb::WHITE));
        assert_eq!(map.sample(&Point2::new(5.5, 5.5)), Some(Rgb::WHITE));
    }
}
