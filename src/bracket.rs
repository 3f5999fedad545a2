//! Circular interpolation over the previous lap.
//!
//! For a query angle the interpolator looks for the nearest previous-lap sample on each
//! side: the smallest non-negative and the largest non-positive signed angular distance.
//! The lap reference point bounds both searches. It sits on the side its own distance
//! falls on, so samples beyond the reference are never picked on that side, but the
//! reference itself is never returned as a bracket.
//!
//! Samples are referred to by index into the lap, which stays valid for as long as the
//! lap is borrowed.

use nalgebra::Point2;

use crate::lap::LapHistory;
use crate::polar::{angle_difference, to_polar, FULL_TURN};
use crate::types::Sample;

/// The nearest previous-lap sample on one side of a query angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Index of the sample in the lap it was found in
    pub index: usize,
    /// Signed angular distance from the query to the sample
    pub distance: f64,
}

/// Result of a bracket search
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Brackets {
    pub positive: Option<Bracket>,
    pub negative: Option<Bracket>,
}

impl Brackets {
    /// Position of the query between the two brackets, 0 at the negative one and 1 at the positive one
    ///
    /// Two brackets at the same distance (the query sits exactly on a sample) give 0.
    pub fn fraction(&self) -> Option<f64> {
        let (positive, negative) = (self.positive?, self.negative?);
        let span = positive.distance - negative.distance;
        if span == 0.0 {
            Some(0.0)
        } else {
            Some(-negative.distance / span)
        }
    }
}

/// Sample quantity that can be projected from the previous lap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleField {
    /// Distance from the wheel center
    Radius,
    /// Timestamp in milliseconds
    Timestamp,
}

impl SampleField {
    pub fn value(&self, center: &Point2<f64>, sample: &Sample) -> f64 {
        match self {
            SampleField::Radius => to_polar(center, &sample.position).radius,
            SampleField::Timestamp => sample.timestamp_ms as f64,
        }
    }
}

/// Expected value of a field at a query angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Both brackets were found and the field was interpolated between them
    Interpolated(f64),
    /// Only one bracket was found; holds that sample's value
    Nearest(f64),
    /// The previous lap gave nothing to project from
    Empty,
}

pub struct BracketInterpolator<'a> {
    center: Point2<f64>,
    reference_angle: f64,
    lap: &'a LapHistory,
}

impl<'a> BracketInterpolator<'a> {
    /// # Arguments
    ///
    /// * `center` - The wheel center the lap angles are measured about
    /// * `reference` - The lap boundary point of the tracked entity
    /// * `lap` - The completed lap to interpolate over
    pub fn new(center: &Point2<f64>, reference: &Point2<f64>, lap: &'a LapHistory) -> Self {
        Self {
            center: *center,
            reference_angle: to_polar(center, reference).angle,
            lap,
        }
    }

    pub fn lap(&self) -> &'a LapHistory {
        self.lap
    }

    /// Finds the nearest lap sample on each side of `query_angle`
    pub fn brackets(&self, query_angle: f64) -> Brackets {
        let mut brackets = Brackets::default();

        let mut positive_limit = FULL_TURN;
        let mut negative_limit = -FULL_TURN;

        let to_reference = angle_difference(query_angle, self.reference_angle);
        if to_reference > 0.0 {
            positive_limit = to_reference;
        } else {
            negative_limit = to_reference;
        }

        for (index, sample) in self.lap.iter().enumerate() {
            let angle = to_polar(&self.center, &sample.position).angle;
            let distance = angle_difference(query_angle, angle);

            if distance >= 0.0 && distance < positive_limit {
                positive_limit = distance;
                brackets.positive = Some(Bracket { index, distance });
            }

            if distance <= 0.0 && distance > negative_limit {
                negative_limit = distance;
                brackets.negative = Some(Bracket { index, distance });
            }
        }

        brackets
    }

    /// Projects `field` at `query_angle` from the lap
    pub fn project(&self, query_angle: f64, field: SampleField) -> Projection {
        let brackets = self.brackets(query_angle);
        let value = |bracket: Bracket| {
            self.lap
                .get(bracket.index)
                .map(|sample| field.value(&self.center, sample))
        };

        match (brackets.negative, brackets.positive) {
            (Some(negative), Some(positive)) => {
                let fraction = brackets.fraction().unwrap_or(0.0);
                match (value(negative), value(positive)) {
                    (Some(negative_value), Some(positive_value)) => Projection::Interpolated(
                        (1.0 - fraction) * negative_value + fraction * positive_value,
                    ),
                    _ => Projection::Empty,
                }
            }
            (Some(bracket), None) | (None, Some(bracket)) => {
                value(bracket).map_or(Projection::Empty, Projection::Nearest)
            }
            (None, None) => Projection::Empty,
        }
    }
}
