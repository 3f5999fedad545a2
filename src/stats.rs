use statrs::statistics::Statistics;

use crate::types::Measurement;

/// Summary of the revolution durations emitted for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapStatistics {
    pub count: usize,
    pub mean_ms: f64,
    /// Sample standard deviation, NaN with fewer than two measurements
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl LapStatistics {
    pub fn from_measurements(measurements: &[Measurement]) -> Option<Self> {
        if measurements.is_empty() {
            return None;
        }
        let durations: Vec<f64> = measurements
            .iter()
            .map(|m| m.lap_duration_ms as f64)
            .collect();

        Some(Self {
            count: durations.len(),
            mean_ms: Statistics::mean(&durations),
            std_dev_ms: Statistics::std_dev(&durations),
            min_ms: Statistics::min(&durations),
            max_ms: Statistics::max(&durations),
        })
    }
}

/// Formats durations the way the console stream prints them: each value followed by a comma
pub fn format_durations(measurements: &[Measurement]) -> String {
    measurements
        .iter()
        .map(|m| format!("{},", m.lap_duration_ms))
        .collect()
}
