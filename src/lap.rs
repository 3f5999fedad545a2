use std::mem;

use nalgebra::Point2;
use statrs::statistics::Statistics;

use crate::types::Sample;

/// Chronological samples of one lap
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LapHistory {
    samples: Vec<Sample>,
}

impl LapHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Mean position of the lap, `None` when the lap is empty
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.samples.is_empty() {
            return None;
        }
        let x = self.samples.iter().map(|s| s.position.x).mean();
        let y = self.samples.iter().map(|s| s.position.y).mean();
        Some(Point2::new(x, y))
    }
}

impl FromIterator<Sample> for LapHistory {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// The lap being recorded and the last completed one
#[derive(Debug, Clone, Default)]
pub struct LapBuffers {
    current: LapHistory,
    previous: LapHistory,
}

impl LapBuffers {
    pub fn current(&self) -> &LapHistory {
        &self.current
    }

    pub fn previous(&self) -> &LapHistory {
        &self.previous
    }

    pub fn record(&mut self, sample: Sample) {
        self.current.push(sample);
    }

    /// Closes the current lap: it becomes the previous lap and recording restarts empty.
    /// The old previous lap is dropped.
    pub fn rotate(&mut self) {
        self.previous = mem::take(&mut self.current);
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }
}
