use std::time::Instant;

use nalgebra::Point2;

/// Position the object locator reports when it found nothing
pub const LOCATOR_NO_DETECTION: (f64, f64) = (-1.0, -1.0);

/// Which of the two tracked objects a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// The ball running in the outer track
    Ball,
    /// The fixed marker (zero pocket) on the rotating wheel
    Marker,
}

impl Entity {
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Ball => "ball",
            Entity::Marker => "marker",
        }
    }
}

/// A single position observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position in locator (screen) coordinates
    pub position: Point2<f64>,
    /// Monotonic timestamp in milliseconds
    pub timestamp_ms: u64,
}

impl Sample {
    pub fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self {
            position: Point2::new(x, y),
            timestamp_ms,
        }
    }

    /// Builds a sample stamped with the time elapsed since `origin`
    pub fn at_instant(position: Point2<f64>, origin: Instant, instant: Instant) -> Self {
        let elapsed = instant.saturating_duration_since(origin);
        Self {
            position,
            timestamp_ms: elapsed.as_millis() as u64,
        }
    }

    /// Converts a raw locator reading into a sample.
    ///
    /// Returns `None` for the locator's `(-1, -1)` "nothing found" reading and for
    /// any non-finite coordinate, so neither can reach the angle or radius math.
    pub fn from_locator(x: f64, y: f64, timestamp_ms: u64) -> Option<Self> {
        if (x, y) == LOCATOR_NO_DETECTION {
            return None;
        }
        let sample = Self::new(x, y, timestamp_ms);
        sample.is_finite().then_some(sample)
    }

    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite() && self.position.y.is_finite()
    }
}

/// One revolution timing emitted for a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Distance from the wheel center at the time of the sample
    pub radius: f64,
    /// Angle in degrees, (0, 360]
    pub angle: f64,
    /// Time taken for the last full revolution at this angle
    pub lap_duration_ms: i64,
    pub timestamp_ms: u64,
}

/// A sample whose radius moved away from the previous lap's radius at the same angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftEvent {
    pub entity: Entity,
    pub sample: Sample,
    /// Absolute radius difference that triggered the flag
    pub radius_difference: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_sentinel_is_no_detection() {
        assert!(Sample::from_locator(-1.0, -1.0, 10).is_none());
        assert!(Sample::from_locator(f64::NAN, 4.0, 10).is_none());
        assert!(Sample::from_locator(3.0, f64::INFINITY, 10).is_none());

        let sample = Sample::from_locator(-1.0, 5.0, 10).unwrap();
        assert_eq!(sample.position, Point2::new(-1.0, 5.0));
        assert_eq!(sample.timestamp_ms, 10);
    }

    #[test]
    fn test_sample_at_instant() {
        let origin = Instant::now();
        let later = origin + std::time::Duration::from_millis(1250);
        let sample = Sample::at_instant(Point2::new(1.0, 2.0), origin, later);
        assert_eq!(sample.timestamp_ms, 1250);

        // An instant before the origin saturates instead of wrapping
        let early = Sample::at_instant(Point2::new(1.0, 2.0), later, origin);
        assert_eq!(early.timestamp_ms, 0);
    }
}
