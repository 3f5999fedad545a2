use nalgebra::Point2;
use tracing::{debug, warn};

use crate::crossing::CrossingDetector;
use crate::drift::RadiusDriftDetector;
use crate::lap::{LapBuffers, LapHistory};
use crate::timing::RevolutionTimer;
use crate::types::{Entity, Measurement, Sample};

/// Whether an entity has a lap boundary yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// Waiting for the first sample after construction or reset
    NoReference,
    /// Lap boundary known, laps are being recorded
    HasReference,
}

/// What one sample changed for an entity
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntityUpdate {
    /// The sample was accepted into the lap history
    pub recorded: bool,
    /// The sample closed a lap
    pub crossed: bool,
    pub measurement: Option<Measurement>,
    /// Radius difference when the sample was flagged as drifting
    pub drift: Option<f64>,
}

/// Lap tracking for one object on the wheel
pub struct TrackedEntityState {
    entity: Entity,
    /// The lap boundary, fixed from the first sample until the next reset
    reference: Option<Point2<f64>>,
    laps: LapBuffers,
    last_sample: Option<Sample>,
    crossing: CrossingDetector,
    timer: RevolutionTimer,
    drift: RadiusDriftDetector,
}

impl TrackedEntityState {
    /// Creates an entity in the `NoReference` state
    ///
    /// # Arguments
    ///
    /// * `entity` - Which object this state tracks, used for logging
    /// * `crossing` - Detector for lap boundaries
    /// * `drift` - Detector for radius drift against the previous lap
    pub fn new(entity: Entity, crossing: CrossingDetector, drift: RadiusDriftDetector) -> Self {
        Self {
            entity,
            reference: None,
            laps: LapBuffers::default(),
            last_sample: None,
            crossing,
            timer: RevolutionTimer,
            drift,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn state(&self) -> TrackingState {
        match self.reference {
            Some(_) => TrackingState::HasReference,
            None => TrackingState::NoReference,
        }
    }

    pub fn reference(&self) -> Option<&Point2<f64>> {
        self.reference.as_ref()
    }

    pub fn current_lap(&self) -> &LapHistory {
        self.laps.current()
    }

    pub fn previous_lap(&self) -> &LapHistory {
        self.laps.previous()
    }

    pub fn last_sample(&self) -> Option<&Sample> {
        self.last_sample.as_ref()
    }

    /// Feeds one sample observed about `center`
    ///
    /// The first sample after construction or reset only fixes the lap boundary. Every
    /// later sample is checked for a crossing against the last recorded sample, recorded
    /// into the current lap, and then timed and drift-checked against the previous lap.
    pub fn update(&mut self, center: &Point2<f64>, sample: Sample) -> EntityUpdate {
        if !sample.is_finite() {
            warn!(
                "Ignoring non-finite {} sample at {}ms",
                self.entity.name(),
                sample.timestamp_ms
            );
            return EntityUpdate::default();
        }

        if let Some(last) = &self.last_sample {
            if sample.timestamp_ms < last.timestamp_ms {
                warn!(
                    "Ignoring out-of-order {} sample: {}ms after {}ms",
                    self.entity.name(),
                    sample.timestamp_ms,
                    last.timestamp_ms
                );
                return EntityUpdate::default();
            }
        }

        let Some(reference) = self.reference else {
            debug!(
                "{} reference set at ({:.1}, {:.1})",
                self.entity.name(),
                sample.position.x,
                sample.position.y
            );
            self.reference = Some(sample.position);
            self.last_sample = Some(sample);
            return EntityUpdate::default();
        };

        // Right after the reference is set the current lap is empty and nothing can be crossed
        let crossed = self.laps.current().last().is_some_and(|last| {
            self.crossing
                .has_crossed(center, &reference, &sample.position, &last.position)
        });
        if crossed {
            debug!(
                "{} crossed reference at {}ms, lap of {} samples closed",
                self.entity.name(),
                sample.timestamp_ms,
                self.laps.current().len()
            );
            self.laps.rotate();
        }

        self.laps.record(sample);
        self.last_sample = Some(sample);

        let previous = self.laps.previous();
        let measurement = self.timer.measure(center, &reference, &sample, previous);
        let drift = self.drift.check(center, &reference, &sample, previous);

        EntityUpdate {
            recorded: true,
            crossed,
            measurement,
            drift,
        }
    }

    /// Forgets the lap boundary and both laps
    pub fn reset(&mut self) {
        self.reference = None;
        self.laps.clear();
        self.last_sample = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar::{from_polar, PolarCoord};

    /// Angular speed of the simulated object in degrees per millisecond
    const DEGREES_PER_MS: f64 = 0.3;

    fn new_state() -> TrackedEntityState {
        TrackedEntityState::new(
            Entity::Marker,
            CrossingDetector::default(),
            RadiusDriftDetector::default(),
        )
    }

    /// Sample k of an object starting at 5 degrees, one sample every 70ms
    fn spin_sample(center: &Point2<f64>, k: u64) -> Sample {
        let timestamp_ms = 70 * k;
        let angle = (5.0 + DEGREES_PER_MS * timestamp_ms as f64).rem_euclid(360.0);
        Sample {
            position: from_polar(center, PolarCoord::new(100.0, angle)),
            timestamp_ms,
        }
    }

    #[test]
    fn test_first_sample_sets_reference_only() {
        let center = Point2::new(0.0, 0.0);
        let mut state = new_state();
        assert_eq!(state.state(), TrackingState::NoReference);

        let first = spin_sample(&center, 0);
        let update = state.update(&center, first);
        assert_eq!(update, EntityUpdate::default());
        assert_eq!(state.state(), TrackingState::HasReference);
        assert_eq!(state.reference(), Some(&first.position));
        assert!(state.current_lap().is_empty());

        // The reference stays put while later samples arrive
        state.update(&center, spin_sample(&center, 1));
        assert_eq!(state.reference(), Some(&first.position));
        assert_eq!(state.current_lap().len(), 1);
    }

    #[test]
    fn test_lap_rotation_and_timing() {
        let center = Point2::new(0.0, 0.0);
        let mut state = new_state();

        // k = 0 sets the reference at 5 degrees, k = 1..=17 fill the first lap
        for k in 0..=17 {
            let update = state.update(&center, spin_sample(&center, k));
            assert!(!update.crossed, "unexpected crossing at k = {k}");
            assert!(update.measurement.is_none());
        }
        assert_eq!(state.current_lap().len(), 17);
        assert!(state.previous_lap().is_empty());

        // k = 18 is at 23 degrees, past the reference
        let update = state.update(&center, spin_sample(&center, 18));
        assert!(update.crossed);
        assert_eq!(state.previous_lap().len(), 17);
        assert_eq!(state.current_lap().len(), 1);
        // Only the far side of the reference has previous samples in range
        assert!(update.measurement.is_none());

        // From k = 19 on, both sides are bracketed and the lap takes 1200ms
        for k in 19..40 {
            let update = state.update(&center, spin_sample(&center, k));
            if update.crossed {
                // Second lap closes at 20 degrees, again with nothing bracketed behind it
                assert_eq!(k, 35);
                assert!(update.measurement.is_none());
                continue;
            }
            let measurement = update.measurement.expect("measurement");
            assert!(
                (measurement.lap_duration_ms - 1200).abs() <= 1,
                "k = {k}: {}",
                measurement.lap_duration_ms
            );
            assert!(update.drift.is_none());
        }
    }

    #[test]
    fn test_reverse_rotation() {
        let center = Point2::new(250.0, 250.0);
        let mut state = new_state();
        // 50 degrees every 100ms backwards, starting at 300
        let sample = |k: u64| Sample {
            position: from_polar(
                &center,
                PolarCoord::new(80.0, (300.0 - 50.0 * k as f64).rem_euclid(360.0)),
            ),
            timestamp_ms: 100 * k,
        };

        state.update(&center, sample(0));
        let mut crossings = Vec::new();
        let mut durations = Vec::new();
        for k in 1..30 {
            let update = state.update(&center, sample(k));
            if update.crossed {
                crossings.push(k);
            }
            if let Some(measurement) = update.measurement {
                durations.push(measurement.lap_duration_ms);
            }
        }

        // 720ms laps; the reference at 300 is passed going from 310 to 260, 320 to 270, ...
        assert_eq!(crossings, vec![8, 15, 22, 29]);
        assert!(durations.len() > 15);
        assert!(durations.iter().all(|d| (*d - 720).abs() <= 1), "{durations:?}");
    }

    #[test]
    fn test_non_finite_and_out_of_order_samples_are_ignored() {
        let center = Point2::new(0.0, 0.0);
        let mut state = new_state();
        state.update(&center, spin_sample(&center, 0));
        state.update(&center, spin_sample(&center, 2));

        let update = state.update(&center, Sample::new(f64::NAN, 1.0, 500));
        assert!(!update.recorded);

        let update = state.update(&center, spin_sample(&center, 1));
        assert!(!update.recorded);

        assert_eq!(state.current_lap().len(), 1);
        assert_eq!(state.last_sample().unwrap().timestamp_ms, 140);
    }

    #[test]
    fn test_reset_returns_to_no_reference() {
        let center = Point2::new(0.0, 0.0);
        let mut state = new_state();
        for k in 0..25 {
            state.update(&center, spin_sample(&center, k));
        }
        assert!(!state.previous_lap().is_empty());

        state.reset();
        assert_eq!(state.state(), TrackingState::NoReference);
        assert!(state.reference().is_none());
        assert!(state.current_lap().is_empty());
        assert!(state.previous_lap().is_empty());

        // Behaves exactly like a fresh state afterwards
        let restart = spin_sample(&center, 30);
        assert_eq!(state.update(&center, restart), EntityUpdate::default());
        assert_eq!(state.reference(), Some(&restart.position));
    }
}
