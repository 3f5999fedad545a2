use nalgebra::Point2;

use crate::polar::{angle_difference, to_polar};

/// Default half-width of the window around the reference angle in which a crossing is recognised
pub const QUARTER_TURN: f64 = 90.0;

/// Detects lap boundaries by checking whether the reference angle lies between two
/// consecutive samples.
///
/// Both samples must fall within `window` degrees of the reference, one on each side. An
/// object that moves further than `window` degrees between two samples skips the
/// boundary without being noticed.
#[derive(Debug, Clone, Copy)]
pub struct CrossingDetector {
    window: f64,
}

impl Default for CrossingDetector {
    fn default() -> Self {
        Self::new(QUARTER_TURN)
    }
}

impl CrossingDetector {
    pub fn new(window: f64) -> Self {
        Self { window }
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    /// Returns true when the move from `previous` to `current` passed over `reference`
    ///
    /// # Arguments
    ///
    /// * `center` - The wheel center the angles are measured about
    /// * `reference` - The point marking the lap boundary
    /// * `current` - The newly observed position
    /// * `previous` - The position observed one sample earlier
    pub fn has_crossed(
        &self,
        center: &Point2<f64>,
        reference: &Point2<f64>,
        current: &Point2<f64>,
        previous: &Point2<f64>,
    ) -> bool {
        let reference_angle = to_polar(center, reference).angle;
        let to_current = angle_difference(reference_angle, to_polar(center, current).angle);
        let to_previous = angle_difference(reference_angle, to_polar(center, previous).angle);

        (self.is_ahead(to_current) && self.is_behind(to_previous))
            || (self.is_ahead(to_previous) && self.is_behind(to_current))
    }

    fn is_ahead(&self, difference: f64) -> bool {
        (0.0..self.window).contains(&difference)
    }

    fn is_behind(&self, difference: f64) -> bool {
        difference < 0.0 && difference > -self.window
    }
}
