//! Pocket lookup on a single-zero wheel.
//!
//! Pockets are numbered from the zero pocket, where the marker sits, in the direction of
//! increasing polar angle. Each pocket spans 360/37 degrees and is centered on its
//! nominal angle, so the zero pocket covers the marker angle +/- half a pocket.

use crate::polar::{angle_difference, FULL_TURN};

pub const POCKET_COUNT: usize = 37;

/// Pocket numbers in wheel order starting from zero
pub const POCKET_ORDER: [u8; POCKET_COUNT] = [
    0, 23, 6, 35, 4, 19, 10, 31, 16, 27, 18, 14, 33, 12, 25, 2, 21, 8, 29, 3, 24, 5, 28, 17, 20, 7,
    36, 11, 32, 30, 15, 26, 1, 22, 9, 34, 13,
];

/// Angular width of one pocket in degrees
pub fn pocket_width() -> f64 {
    FULL_TURN / POCKET_COUNT as f64
}

/// Position of the pocket under `ball_angle` counted from the zero pocket at `marker_angle`
pub fn pocket_index(ball_angle: f64, marker_angle: f64) -> usize {
    let width = pocket_width();
    let offset = angle_difference(marker_angle, ball_angle) + width / 2.0;
    let index = (offset.rem_euclid(FULL_TURN) / width) as usize;
    index.min(POCKET_COUNT - 1)
}

/// Pocket number under `ball_angle`
pub fn pocket_at(ball_angle: f64, marker_angle: f64) -> u8 {
    POCKET_ORDER[pocket_index(ball_angle, marker_angle)]
}
