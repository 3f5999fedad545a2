use nalgebra::Point2;
use tracing::{debug, info, warn};

use crate::center::CenterCalibrator;
use crate::config::{RecenterSource, TrackerConfig};
use crate::crossing::CrossingDetector;
use crate::drift::RadiusDriftDetector;
use crate::pockets::pocket_at;
use crate::polar::to_polar;
use crate::stats::{format_durations, LapStatistics};
use crate::tracking::{EntityUpdate, TrackedEntityState};
use crate::types::{DriftEvent, Entity, Measurement, Sample, LOCATOR_NO_DETECTION};

/// Control input from the user interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forget both lap boundaries, all laps and all logged output
    Reset,
    /// Suspend or resume sample ingestion, keeping all state
    ToggleTracking,
}

/// What happened during one processing cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub ball: EntityUpdate,
    pub marker: EntityUpdate,
    /// Wheel center after this cycle's recentering
    pub center: Point2<f64>,
}

/// Tracks the ball and the wheel marker around a shared, self-correcting center
pub struct WheelTracker {
    center: Point2<f64>,
    calibrator: CenterCalibrator,
    recenter_from: RecenterSource,
    ball: TrackedEntityState,
    marker: TrackedEntityState,
    tracking_enabled: bool,
    ball_measurements: Vec<Measurement>,
    marker_measurements: Vec<Measurement>,
    drift_events: Vec<DriftEvent>,
}

impl Default for WheelTracker {
    fn default() -> Self {
        Self::new(&TrackerConfig::default())
    }
}

impl WheelTracker {
    pub fn new(config: &TrackerConfig) -> Self {
        let crossing = CrossingDetector::new(config.crossing_window_degrees);
        let drift = RadiusDriftDetector::new(config.drift_threshold);

        Self {
            center: config.initial_center(),
            calibrator: CenterCalibrator::new(config.center_blend),
            recenter_from: config.recenter_from,
            ball: TrackedEntityState::new(Entity::Ball, crossing, drift),
            marker: TrackedEntityState::new(Entity::Marker, crossing, drift),
            tracking_enabled: true,
            ball_measurements: Vec::new(),
            marker_measurements: Vec::new(),
            drift_events: Vec::new(),
        }
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking_enabled
    }

    pub fn entity(&self, entity: Entity) -> &TrackedEntityState {
        match entity {
            Entity::Ball => &self.ball,
            Entity::Marker => &self.marker,
        }
    }

    /// Every measurement emitted for `entity` since the last reset, oldest first
    pub fn measurements(&self, entity: Entity) -> &[Measurement] {
        match entity {
            Entity::Ball => &self.ball_measurements,
            Entity::Marker => &self.marker_measurements,
        }
    }

    pub fn drift_events(&self) -> &[DriftEvent] {
        &self.drift_events
    }

    /// Durations of `entity` as the comma separated console stream
    pub fn duration_log(&self, entity: Entity) -> String {
        format_durations(self.measurements(entity))
    }

    pub fn lap_statistics(&self, entity: Entity) -> Option<LapStatistics> {
        LapStatistics::from_measurements(self.measurements(entity))
    }

    /// Pocket currently under the ball, once both entities have been seen
    pub fn ball_pocket(&self) -> Option<u8> {
        let ball = self.ball.last_sample()?;
        let marker = self.marker.last_sample()?;
        let ball_angle = to_polar(&self.center, &ball.position).angle;
        let marker_angle = to_polar(&self.center, &marker.position).angle;
        Some(pocket_at(ball_angle, marker_angle))
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Reset => {
                info!("Resetting wheel tracking");
                self.ball.reset();
                self.marker.reset();
                self.ball_measurements.clear();
                self.marker_measurements.clear();
                self.drift_events.clear();
            }
            Command::ToggleTracking => {
                self.tracking_enabled = !self.tracking_enabled;
                if self.tracking_enabled {
                    info!("Tracking enabled");
                } else {
                    info!("Tracking disabled");
                }
            }
        }
    }

    /// Runs one cycle with whatever the locator found for each entity
    ///
    /// `None` means nothing was detected and leaves that entity untouched. The marker is
    /// processed first; the center is then pulled toward the marker's previous lap before
    /// the ball is processed.
    pub fn process(&mut self, ball: Option<Sample>, marker: Option<Sample>) -> CycleReport {
        let mut report = CycleReport {
            ball: EntityUpdate::default(),
            marker: EntityUpdate::default(),
            center: self.center,
        };
        if !self.tracking_enabled {
            return report;
        }

        if let Some(sample) = detected(Entity::Marker, marker) {
            report.marker = self.marker.update(&self.center, sample);
            self.log(Entity::Marker, sample, &report.marker);

            if self.recenter_from == RecenterSource::Marker {
                let center = self.calibrator.recenter(&self.center, self.marker.previous_lap());
                if center != self.center {
                    debug!("Center moved to ({:.2}, {:.2})", center.x, center.y);
                }
                self.center = center;
            }
        }

        if let Some(sample) = detected(Entity::Ball, ball) {
            report.ball = self.ball.update(&self.center, sample);
            self.log(Entity::Ball, sample, &report.ball);
        }

        report.center = self.center;
        report
    }

    fn log(&mut self, entity: Entity, sample: Sample, update: &EntityUpdate) {
        if let Some(measurement) = update.measurement {
            debug!(
                "{} lap {}ms at {:.1} degrees",
                entity.name(),
                measurement.lap_duration_ms,
                measurement.angle
            );
            match entity {
                Entity::Ball => self.ball_measurements.push(measurement),
                Entity::Marker => self.marker_measurements.push(measurement),
            }
        }
        if let Some(radius_difference) = update.drift {
            debug!(
                "{} radius drift of {:.2} at {}ms",
                entity.name(),
                radius_difference,
                sample.timestamp_ms
            );
            self.drift_events.push(DriftEvent {
                entity,
                sample,
                radius_difference,
            });
        }
    }
}

/// Treats the locator sentinel and non-finite positions as no detection
fn detected(entity: Entity, sample: Option<Sample>) -> Option<Sample> {
    match sample {
        Some(sample) if (sample.position.x, sample.position.y) == LOCATOR_NO_DETECTION => None,
        Some(sample) if !sample.is_finite() => {
            warn!(
                "Dropping non-finite {} sample at {}ms",
                entity.name(),
                sample.timestamp_ms
            );
            None
        }
        other => other,
    }
}
