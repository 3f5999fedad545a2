use nalgebra::Point2;

use crate::bracket::{BracketInterpolator, Projection, SampleField};
use crate::lap::LapHistory;
use crate::polar::to_polar;
use crate::types::{Measurement, Sample};

/// Measures how long the last full revolution took at a sample's angle
///
/// The timestamp at which the previous lap passed the sample's angle is interpolated
/// from the two bracketing previous-lap samples. A one-sided projection would compare
/// against a different angle, so it yields no duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevolutionTimer;

impl RevolutionTimer {
    /// Elapsed milliseconds since the previous lap was at the angle of `sample`
    ///
    /// Returns `None` while the previous lap is empty or does not bracket the sample.
    pub fn lap_duration_ms(
        &self,
        center: &Point2<f64>,
        reference: &Point2<f64>,
        sample: &Sample,
        previous: &LapHistory,
    ) -> Option<i64> {
        if previous.is_empty() {
            return None;
        }

        let angle = to_polar(center, &sample.position).angle;
        let interpolator = BracketInterpolator::new(center, reference, previous);
        match interpolator.project(angle, SampleField::Timestamp) {
            Projection::Interpolated(projected_ms) => {
                Some(sample.timestamp_ms as i64 - projected_ms.round() as i64)
            }
            Projection::Nearest(_) | Projection::Empty => None,
        }
    }

    /// Builds a measurement for `sample`, only for a positive duration
    pub fn measure(
        &self,
        center: &Point2<f64>,
        reference: &Point2<f64>,
        sample: &Sample,
        previous: &LapHistory,
    ) -> Option<Measurement> {
        let lap_duration_ms = self
            .lap_duration_ms(center, reference, sample, previous)
            .filter(|duration| *duration > 0)?;
        let polar = to_polar(center, &sample.position);

        Some(Measurement {
            radius: polar.radius,
            angle: polar.angle,
            lap_duration_ms,
            timestamp_ms: sample.timestamp_ms,
        })
    }
}
