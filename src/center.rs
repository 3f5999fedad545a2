use nalgebra::Point2;

use crate::lap::LapHistory;

/// Default weight of the lap centroid when recentering
pub const DEFAULT_CENTER_BLEND: f64 = 0.5;

/// Pulls the wheel center toward the centroid of the last completed lap
///
/// Applied every cycle, this acts as a single-pole low-pass filter on the centroid.
#[derive(Debug, Clone, Copy)]
pub struct CenterCalibrator {
    blend: f64,
}

impl Default for CenterCalibrator {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER_BLEND)
    }
}

impl CenterCalibrator {
    pub fn new(blend: f64) -> Self {
        Self { blend }
    }

    /// Returns the updated center, or `center` unchanged when `previous` is empty
    pub fn recenter(&self, center: &Point2<f64>, previous: &LapHistory) -> Point2<f64> {
        match previous.centroid() {
            Some(centroid) => Point2::from(center.coords.lerp(&centroid.coords, self.blend)),
            None => *center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar::{from_polar, PolarCoord};
    use crate::types::Sample;
    use nalgebra::distance;

    #[test]
    fn test_converges_to_lap_centroid() {
        let true_center = Point2::new(320.0, 240.0);
        let lap: LapHistory = (0..12)
            .map(|i| Sample {
                position: from_polar(&true_center, PolarCoord::new(150.0, 30.0 * i as f64 + 15.0)),
                timestamp_ms: i * 100,
            })
            .collect();
        let calibrator = CenterCalibrator::default();

        let mut center = Point2::new(300.0, 270.0);
        let mut last_distance = distance(&center, &true_center);
        for _ in 0..10 {
            center = calibrator.recenter(&center, &lap);
            let current_distance = distance(&center, &true_center);
            assert!((current_distance - last_distance / 2.0).abs() < 1e-6);
            last_distance = current_distance;
        }
        assert!(last_distance < 0.05);
    }

    #[test]
    fn test_empty_lap_keeps_center() {
        let center = Point2::new(1.0, 2.0);
        let calibrator = CenterCalibrator::default();
        assert_eq!(calibrator.recenter(&center, &LapHistory::new()), center);
    }
}
