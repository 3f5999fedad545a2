use std::f64::consts::PI;

use nalgebra::{Point2, Vector2};

/// Full turn in degrees
pub const FULL_TURN: f64 = 360.0;

/// Half turn in degrees
pub const HALF_TURN: f64 = 180.0;

/// A position expressed relative to the wheel center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarCoord {
    /// Euclidean distance from the center, always >= 0
    pub radius: f64,
    /// Angle in degrees, in (0, 360]
    pub angle: f64,
}

impl PolarCoord {
    pub fn new(radius: f64, angle: f64) -> Self {
        Self { radius, angle }
    }
}

/// Converts a point into polar coordinates about `center`
///
/// The angle is `atan2(dy, dx)` shifted by half a turn, so the wrap point sits on the
/// negative x axis: a point straight to the left of the center reads exactly 360 and
/// never 0. A point on the center reads radius 0, angle 180.
pub fn to_polar(center: &Point2<f64>, point: &Point2<f64>) -> PolarCoord {
    let offset = point - center;
    let radius = offset.norm();

    let mut angle = (offset.y.atan2(offset.x) + PI) * HALF_TURN / PI;
    // atan2(-0.0, -x) is -pi
    if angle <= 0.0 {
        angle += FULL_TURN;
    }

    PolarCoord { radius, angle }
}

/// Inverse of [`to_polar`]
pub fn from_polar(center: &Point2<f64>, polar: PolarCoord) -> Point2<f64> {
    let radians = polar.angle.to_radians() - PI;
    center + Vector2::new(radians.cos(), radians.sin()) * polar.radius
}

/// Shortest signed rotation in degrees that takes `from` onto `to`
///
/// The result lies in [-180, 180). Swapping the arguments negates the result except for
/// opposite angles, where both orders read -180.
pub fn angle_difference(from: f64, to: f64) -> f64 {
    (to - from + HALF_TURN + FULL_TURN).rem_euclid(FULL_TURN) - HALF_TURN
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_angle_convention_boundaries() {
        let center = Point2::new(100.0, 100.0);

        // Straight left of the center is the wrap point and reads 360, not 0
        let left = to_polar(&center, &Point2::new(50.0, 100.0));
        assert!((left.radius - 50.0).abs() < EPSILON);
        assert_eq!(left.angle, 360.0);

        let right = to_polar(&center, &Point2::new(150.0, 100.0));
        assert!((right.angle - 180.0).abs() < EPSILON);

        let below = to_polar(&center, &Point2::new(100.0, 60.0));
        assert!((below.angle - 90.0).abs() < EPSILON);

        let above = to_polar(&center, &Point2::new(100.0, 140.0));
        assert!((above.angle - 270.0).abs() < EPSILON);
    }

    #[test]
    fn test_negative_zero_wraps_to_full_turn() {
        let polar = to_polar(&Point2::new(0.0, 0.0), &Point2::new(-3.0, -0.0));
        assert_eq!(polar.angle, 360.0);
    }

    #[test]
    fn test_center_has_zero_radius() {
        let center = Point2::new(12.5, -4.0);
        let polar = to_polar(&center, &center);
        assert_eq!(polar.radius, 0.0);
        assert!((polar.angle - 180.0).abs() < EPSILON);
    }

    #[test]
    fn test_from_polar_inverts_to_polar() {
        let center = Point2::new(320.0, 240.0);
        for angle in [1.0, 45.0, 90.0, 179.5, 270.0, 359.0] {
            let point = from_polar(&center, PolarCoord::new(80.0, angle));
            let polar = to_polar(&center, &point);
            assert!((polar.radius - 80.0).abs() < 1e-6);
            assert!((polar.angle - angle).abs() < 1e-6, "angle {angle} read {}", polar.angle);
        }
    }

    #[test]
    fn test_angle_difference_self_is_zero() {
        for angle in [0.0, 0.001, 90.0, 180.0, 270.5, 359.999, 360.0] {
            assert_eq!(angle_difference(angle, angle), 0.0);
        }
    }

    #[test]
    fn test_angle_difference_wraps() {
        assert!((angle_difference(350.0, 10.0) - 20.0).abs() < EPSILON);
        assert!((angle_difference(10.0, 350.0) + 20.0).abs() < EPSILON);
        assert!((angle_difference(360.0, 1.0) - 1.0).abs() < EPSILON);
        assert!((angle_difference(90.0, 45.0) + 45.0).abs() < EPSILON);
    }

    #[test]
    fn test_angle_difference_is_antisymmetric() {
        let angles = [0.5, 12.0, 89.9, 135.0, 200.25, 300.0, 359.5];
        for &a in &angles {
            for &b in &angles {
                let forward = angle_difference(a, b);
                let backward = angle_difference(b, a);
                assert!((forward + backward).abs() < 1e-9, "{a} -> {b}");
            }
        }
    }

    #[test]
    fn test_angle_difference_opposite_reads_same_both_ways() {
        assert_eq!(angle_difference(0.0, 180.0), -180.0);
        assert_eq!(angle_difference(180.0, 0.0), -180.0);
        assert_eq!(angle_difference(90.0, 270.0), -180.0);
        assert_eq!(angle_difference(270.0, 90.0), -180.0);
    }
}
