use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use nalgebra::Point2;
use serde::Deserialize;

use crate::center::DEFAULT_CENTER_BLEND;
use crate::crossing::QUARTER_TURN;
use crate::drift::DEFAULT_DRIFT_THRESHOLD;
use crate::polar::HALF_TURN;

/// Which entity's previous lap pulls the shared wheel center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecenterSource {
    /// The marker is fixed to the wheel, so its laps circle the true center
    Marker,
    /// Keep the initial center
    None,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Radius difference above which a sample counts as drifting
    pub drift_threshold: f64,
    /// Half-width of the crossing window around the reference angle
    pub crossing_window_degrees: f64,
    /// Weight of the lap centroid each time the center is updated
    pub center_blend: f64,
    /// Starting wheel center, defaults to the middle of the frame
    pub initial_center: Option<[f64; 2]>,
    /// Width and height of the capture area
    pub frame_size: [f64; 2],
    pub recenter_from: RecenterSource,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            drift_threshold: DEFAULT_DRIFT_THRESHOLD,
            crossing_window_degrees: QUARTER_TURN,
            center_blend: DEFAULT_CENTER_BLEND,
            initial_center: None,
            frame_size: [800.0, 800.0],
            recenter_from: RecenterSource::Marker,
        }
    }
}

impl TrackerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: TrackerConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.drift_threshold.is_finite() && self.drift_threshold > 0.0,
            "drift_threshold must be positive, got {}",
            self.drift_threshold
        );
        ensure!(
            self.crossing_window_degrees > 0.0 && self.crossing_window_degrees <= HALF_TURN,
            "crossing_window_degrees must be in (0, 180], got {}",
            self.crossing_window_degrees
        );
        ensure!(
            self.center_blend > 0.0 && self.center_blend <= 1.0,
            "center_blend must be in (0, 1], got {}",
            self.center_blend
        );
        let [width, height] = self.frame_size;
        ensure!(
            width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
            "frame_size must be finite and positive, got [{width}, {height}]"
        );
        if let Some([x, y]) = self.initial_center {
            ensure!(
                x.is_finite() && y.is_finite(),
                "initial_center must be finite"
            );
        }
        Ok(())
    }

    /// The configured center, or the middle of the frame
    pub fn initial_center(&self) -> Point2<f64> {
        match self.initial_center {
            Some([x, y]) => Point2::new(x, y),
            None => Point2::new(self.frame_size[0] / 2.0, self.frame_size[1] / 2.0),
        }
    }
}
