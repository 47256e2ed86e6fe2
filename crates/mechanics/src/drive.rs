//! Differential Drive Kinematics
//!
//! Converts the two wheel speeds into a body twist and advances the pose with it.
//! Wheel geometry is in meters; the pose lives in map pixels, so the forward speed is
//! scaled by `pixels_per_meter` while the yaw rate is scale-free.

use simcore::{ExplicitEuler, Integrator, Pose, SimContext, Twist};

use crate::motor::{Motor, rpm_to_rad_per_sec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Distance between the wheel contact points, m.
    pub width: f64,
    /// Map pixels per meter of travel.
    pub pixels_per_meter: f64,
}

impl DifferentialDrive {
    pub fn new(width: f64, pixels_per_meter: f64) -> Self {
        DifferentialDrive {
            width,
            pixels_per_meter,
        }
    }

    /// Body twist from the linear wheel speeds, m/s.
    pub fn wheel_twist(&self, v_left: f64, v_right: f64) -> Twist {
        Twist {
            linear: (v_left + v_right) / 2.0 * self.pixels_per_meter,
            angular: (v_right - v_left) / self.width,
        }
    }

    /// Body twist produced by the current motor commands.
    pub fn twist(&self, left: &Motor, right: &Motor) -> Twist {
        self.wheel_twist(left.linear_speed(), right.linear_speed())
    }

    /// Pose after `ctx.dt` seconds at the current motor commands.
    pub fn integrate<I: Integrator>(
        &self,
        integrator: &I,
        ctx: &SimContext,
        pose: Pose,
        left: &Motor,
        right: &Motor,
    ) -> Pose {
        let mut next = pose;
        integrator.step(ctx, &self.twist(left, right), &mut next);
        next
    }

    /// Single explicit Euler step from raw rpm commands.
    pub fn euler_step(
        &self,
        pose: Pose,
        left_rpm: f64,
        right_rpm: f64,
        wheel_radius: f64,
        dt: f64,
    ) -> Pose {
        let twist = self.wheel_twist(
            rpm_to_rad_per_sec(left_rpm) * wheel_radius,
            rpm_to_rad_per_sec(right_rpm) * wheel_radius,
        );
        let mut next = pose;
        ExplicitEuler::default().step(&SimContext { dt, t: 0.0 }, &twist, &mut next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equal_speeds_drive_straight() {
        let drive = DifferentialDrive::new(0.17, 1.0);
        for heading in [0.0, 0.7, -2.9, 7.5] {
            let start = Pose::new(100.0, 50.0, heading);
            let next = drive.euler_step(start, 250.0, 250.0, 0.016, 0.02);

            assert_eq!(next.heading, heading);
            let dx = next.x - start.x;
            let dy = next.y - start.y;
            // Displacement is parallel to the heading and forward
            assert!((dx * heading.sin() - dy * heading.cos()).abs() < 1e-12);
            assert!(dx * heading.cos() + dy * heading.sin() > 0.0);
        }
    }

    #[test]
    fn test_forward_distance_matches_wheel_speed() {
        let drive = DifferentialDrive::new(0.17, 1.0);
        let next = drive.euler_step(Pose::new(0.0, 0.0, 0.0), 120.0, 120.0, 0.02, 0.5);
        let expected = rpm_to_rad_per_sec(120.0) * 0.02 * 0.5;
        assert_relative_eq!(next.x, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_pixel_scale_only_affects_translation() {
        let drive = DifferentialDrive::new(0.2, 1.0);
        let scaled = DifferentialDrive::new(0.2, 400.0);

        let a = drive.wheel_twist(0.1, 0.3);
        let b = scaled.wheel_twist(0.1, 0.3);

        assert_relative_eq!(b.linear, a.linear * 400.0, epsilon = 1e-12);
        assert_eq!(a.angular, b.angular);
        assert_relative_eq!(a.angular, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_faster_right_wheel_turns_left() {
        let drive = DifferentialDrive::new(0.17, 1.0);
        let next = drive.euler_step(Pose::new(0.0, 0.0, 0.0), 100.0, 200.0, 0.016, 0.1);
        assert!(next.heading > 0.0);
    }

    #[test]
    fn test_spin_in_place() {
        let drive = DifferentialDrive::new(0.17, 1.0);
        let next = drive.euler_step(Pose::new(5.0, 5.0, 0.0), -200.0, 200.0, 0.016, 0.1);
        assert_eq!(next.x, 5.0);
        assert_eq!(next.y, 5.0);
        assert!(next.heading > 0.0);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let drive = DifferentialDrive::new(0.17, 3779.52);
        let start = Pose::new(42.0, 17.0, 0.3);
        assert_eq!(drive.euler_step(start, 10.0, 900.0, 0.016, 0.0), start);
    }
}
