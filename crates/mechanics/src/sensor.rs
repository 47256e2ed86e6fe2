//! Line Sensor
//!
//! A reflectance sensor mounted at a fixed polar offset from the robot origin. Its map
//! position is derived from the robot pose; its reading comes from the pixel underneath.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use simcore::{AxisConvention, Pose, Rgb, SensorGroup, TrackSurface, map_to_local, polar_to_map};
use thiserror::Error;

/// Mounting offset in the robot frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorOffset {
    /// Distance from the robot origin, map pixels.
    pub distance: f64,
    /// Angle from the heading, rad. Positive is to the robot's left.
    pub angle: f64,
}

impl SensorOffset {
    pub fn new(distance: f64, angle: f64) -> Self {
        SensorOffset { distance, angle }
    }

    /// Offset of a robot-frame vector `forward` ahead and `left` to the side.
    pub fn from_cartesian(forward: f64, left: f64) -> Self {
        SensorOffset {
            distance: forward.hypot(left),
            angle: left.atan2(forward),
        }
    }

    /// Offset that places a sensor on `point` while the robot stands at `pose`.
    pub fn from_absolute(point: &Point2<f64>, pose: &Pose, axis: AxisConvention) -> Self {
        let local = map_to_local(pose, point, axis);
        Self::from_cartesian(local.x, local.y)
    }
}

/// Which surface brightness counts as a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinePolarity {
    /// Pixels at or above the threshold read 1.
    #[default]
    Light,
    /// Pixels below the threshold read 1.
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingMode {
    /// 0.0 or 1.0.
    #[default]
    Binary,
    /// Normalized luminance in [0, 1], inverted for `Dark` polarity.
    Analog,
}

/// Maps a sampled pixel to a sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineClassifier {
    pub polarity: LinePolarity,
    /// Luminance threshold on the 0-255 channel mean.
    pub threshold: f64,
    pub mode: ReadingMode,
}

impl Default for LineClassifier {
    fn default() -> Self {
        LineClassifier {
            polarity: LinePolarity::Light,
            threshold: 255.0 / 2.0,
            mode: ReadingMode::Binary,
        }
    }
}

impl LineClassifier {
    pub fn classify(&self, color: Rgb) -> f64 {
        let luminance = color.luminance();
        match self.mode {
            ReadingMode::Binary => {
                let hit = match self.polarity {
                    LinePolarity::Light => luminance >= self.threshold,
                    LinePolarity::Dark => luminance < self.threshold,
                };
                if hit { 1.0 } else { 0.0 }
            }
            ReadingMode::Analog => {
                let level = luminance / 255.0;
                match self.polarity {
                    LinePolarity::Light => level,
                    LinePolarity::Dark => 1.0 - level,
                }
            }
        }
    }
}

/// A sensor sampled a position outside the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sensor {index} sampled outside the map")]
pub struct OffMap {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSensor {
    offset: SensorOffset,
    group: SensorGroup,
    color_tag: Option<Rgb>,
    position: Point2<f64>,
    reading: f64,
}

impl LineSensor {
    /// Creates a sensor already placed relative to `pose`.
    pub fn new(
        offset: SensorOffset,
        group: SensorGroup,
        pose: &Pose,
        axis: AxisConvention,
    ) -> Self {
        let mut sensor = LineSensor {
            offset,
            group,
            color_tag: None,
            position: Point2::origin(),
            reading: 0.0,
        };
        sensor.place(pose, axis);
        sensor
    }

    pub fn with_color_tag(mut self, tag: Option<Rgb>) -> Self {
        self.color_tag = tag;
        self
    }

    pub fn offset(&self) -> SensorOffset {
        self.offset
    }

    pub fn group(&self) -> SensorGroup {
        self.group
    }

    /// Display color, carried for the renderer only.
    pub fn color_tag(&self) -> Option<Rgb> {
        self.color_tag
    }

    pub fn position(&self) -> Point2<f64> {
        self.position
    }

    pub fn reading(&self) -> f64 {
        self.reading
    }

    /// Pixel under the sensor, `None` off the raster.
    pub fn sample<S: TrackSurface + ?Sized>(&self, surface: &S) -> Option<Rgb> {
        surface.sample(&self.position)
    }

    pub(crate) fn place(&mut self, pose: &Pose, axis: AxisConvention) {
        self.position = polar_to_map(pose, self.offset.distance, self.offset.angle, axis);
    }

    pub(crate) fn record(&mut self, color: Rgb, classifier: &LineClassifier) {
        self.reading = classifier.classify(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use simcore::{MapExtent, RasterMap};

    #[test]
    fn test_sensor_ahead_at_zero_heading() {
        let pose = Pose::new(120.0, 80.0, 0.0);
        let sensor = LineSensor::new(
            SensorOffset::new(30.0, 0.0),
            SensorGroup::Left,
            &pose,
            AxisConvention::MathUp,
        );
        assert_eq!(sensor.position(), Point2::new(150.0, 80.0));
    }

    #[test]
    fn test_place_follows_pose() {
        let offset = SensorOffset::from_cartesian(20.0, 5.0);
        let mut sensor = LineSensor::new(
            offset,
            SensorGroup::Left,
            &Pose::default(),
            AxisConvention::MathUp,
        );

        let pose = Pose::new(50.0, 50.0, std::f64::consts::PI);
        sensor.place(&pose, AxisConvention::MathUp);

        assert_relative_eq!(sensor.position().x, 30.0, epsilon = 1e-9);
        assert_relative_eq!(sensor.position().y, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_from_absolute_round_trips_placement() {
        let pose = Pose::new(400.0, 300.0, 0.9);
        let clicked = Point2::new(430.0, 310.0);
        let offset = SensorOffset::from_absolute(&clicked, &pose, AxisConvention::ScreenDown);

        let sensor = LineSensor::new(offset, SensorGroup::Right, &pose, AxisConvention::ScreenDown);
        assert_relative_eq!(sensor.position().x, clicked.x, epsilon = 1e-9);
        assert_relative_eq!(sensor.position().y, clicked.y, epsilon = 1e-9);
    }

    #[test]
    fn test_from_cartesian_left_is_positive_angle() {
        let offset = SensorOffset::from_cartesian(10.0, 10.0);
        assert_relative_eq!(offset.angle, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(offset.distance, 200.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_binary_light_polarity_matches_mid_gray_threshold() {
        let classifier = LineClassifier::default();
        assert_eq!(classifier.classify(Rgb::WHITE), 1.0);
        assert_eq!(classifier.classify(Rgb::BLACK), 0.0);
        assert_eq!(classifier.classify(Rgb::new(127, 127, 127)), 0.0);
        assert_eq!(classifier.classify(Rgb::new(128, 128, 128)), 1.0);
    }

    #[test]
    fn test_binary_dark_polarity() {
        let classifier = LineClassifier {
            polarity: LinePolarity::Dark,
            ..Default::default()
        };
        assert_eq!(classifier.classify(Rgb::BLACK), 1.0);
        assert_eq!(classifier.classify(Rgb::WHITE), 0.0);
    }

    #[test]
    fn test_analog_reading() {
        let light = LineClassifier {
            mode: ReadingMode::Analog,
            ..Default::default()
        };
        let dark = LineClassifier {
            polarity: LinePolarity::Dark,
            mode: ReadingMode::Analog,
            ..Default::default()
        };
        let gray = Rgb::new(51, 51, 51);
        assert_relative_eq!(light.classify(gray), 0.2, epsilon = 1e-12);
        assert_relative_eq!(dark.classify(gray), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_record_uses_sampled_pixel() {
        let mut map = RasterMap::filled(MapExtent::new(20, 20), Rgb::BLACK);
        map.set_pixel(15, 10, Rgb::WHITE);

        let pose = Pose::new(10.2, 10.7, 0.0);
        let mut sensor = LineSensor::new(
            SensorOffset::new(5.0, 0.0),
            SensorGroup::Left,
            &pose,
            AxisConvention::MathUp,
        );

        let color = sensor.sample(&map).unwrap();
        sensor.record(color, &LineClassifier::default());
        assert_eq!(sensor.reading(), 1.0);
    }

    #[test]
    fn test_sample_off_raster_is_none() {
        let map = RasterMap::filled(MapExtent::new(20, 20), Rgb::WHITE);
        let pose = Pose::new(18.0, 10.0, 0.0);
        let sensor = LineSensor::new(
            SensorOffset::new(5.0, 0.0),
            SensorGroup::Left,
            &pose,
            AxisConvention::MathUp,
        );
        assert!(sensor.sample(&map).is_none());
    }
}
