use nalgebra::Point2;

use crate::bracket::{BracketInterpolator, Projection, SampleField};
use crate::lap::LapHistory;
use crate::polar::to_polar;
use crate::types::Sample;

/// Default radius difference, in position units, above which a sample is flagged
pub const DEFAULT_DRIFT_THRESHOLD: f64 = 5.0;

/// Flags samples whose radius moved away from where the previous lap was at the same angle
///
/// Unlike [`crate::timing::RevolutionTimer`], a one-sided projection is still used here:
/// the nearest previous-lap radius is compared directly.
#[derive(Debug, Clone, Copy)]
pub struct RadiusDriftDetector {
    threshold: f64,
}

impl Default for RadiusDriftDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DRIFT_THRESHOLD)
    }
}

impl RadiusDriftDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Absolute difference between the sample radius and the radius projected from `previous`
    ///
    /// Returns 0 when the previous lap gives nothing to compare against.
    pub fn radius_difference(
        &self,
        center: &Point2<f64>,
        reference: &Point2<f64>,
        sample: &Sample,
        previous: &LapHistory,
    ) -> f64 {
        if previous.is_empty() {
            return 0.0;
        }

        let polar = to_polar(center, &sample.position);
        let interpolator = BracketInterpolator::new(center, reference, previous);
        match interpolator.project(polar.angle, SampleField::Radius) {
            Projection::Interpolated(radius) | Projection::Nearest(radius) => {
                (radius - polar.radius).abs()
            }
            Projection::Empty => 0.0,
        }
    }

    /// Returns the radius difference when it exceeds the threshold
    pub fn check(
        &self,
        center: &Point2<f64>,
        reference: &Point2<f64>,
        sample: &Sample,
        previous: &LapHistory,
    ) -> Option<f64> {
        let difference = self.radius_difference(center, reference, sample, previous);
        (difference > self.threshold).then_some(difference)
    }
}
