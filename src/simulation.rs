use anyhow::{ensure, Result};
use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::polar::{from_polar, PolarCoord, FULL_TURN};
use crate::types::Sample;

/// Milliseconds per minute, for rpm conversions
const MS_PER_MINUTE: f64 = 60_000.0;

/// An object circling a fixed center
pub struct PolarCircular {
    center: Point2<f64>,
    radius: f64,
    /// Degrees per millisecond, negative for decreasing angles
    angular_velocity: f64,
    start_angle: f64,
    /// Radius lost per millisecond
    radius_decay: f64,
    min_radius: f64,
}

impl PolarCircular {
    /// Create a new PolarCircular instance
    pub fn new(center: Point2<f64>, radius: f64, rpm: f64) -> Self {
        Self {
            center,
            radius,
            angular_velocity: rpm * FULL_TURN / MS_PER_MINUTE,
            start_angle: 0.0,
            radius_decay: 0.0,
            min_radius: radius,
        }
    }

    pub fn with_start_angle(mut self, angle: f64) -> Self {
        self.start_angle = angle;
        self
    }

    /// Shrinks the radius linearly over time down to `min_radius`
    pub fn with_radius_decay(mut self, per_ms: f64, min_radius: f64) -> Self {
        self.radius_decay = per_ms;
        self.min_radius = min_radius;
        self
    }

    /// Time for one full revolution
    pub fn period_ms(&self) -> f64 {
        FULL_TURN / self.angular_velocity.abs()
    }

    /// Gets the state of the object at a given time
    pub fn state(&self, time_ms: f64) -> PolarCoord {
        let radius = (self.radius - self.radius_decay * time_ms).max(self.min_radius);
        let mut angle = (self.start_angle + self.angular_velocity * time_ms).rem_euclid(FULL_TURN);
        if angle == 0.0 {
            angle = FULL_TURN;
        }
        PolarCoord { radius, angle }
    }

    pub fn position(&self, time_ms: f64) -> Point2<f64> {
        from_polar(&self.center, self.state(time_ms))
    }
}

/// Adds gaussian noise to both coordinates of a position
pub fn add_noise<R: Rng + ?Sized>(
    position: Point2<f64>,
    noise: &Normal<f64>,
    rng: &mut R,
) -> Point2<f64> {
    position + Vector2::new(noise.sample(rng), noise.sample(rng))
}

/// A ball and a wheel marker observed frame by frame by an imperfect locator
pub struct WheelSimulation {
    ball: PolarCircular,
    marker: PolarCircular,
    noise: Normal<f64>,
    dropout: f64,
    frame_ms: u64,
    frame: u64,
    rng: StdRng,
}

impl WheelSimulation {
    /// # Arguments
    ///
    /// * `ball` - Path of the ball
    /// * `marker` - Path of the wheel marker
    /// * `noise_sigma` - Standard deviation of the locator position error
    /// * `dropout` - Probability that the locator misses an object in a frame
    /// * `frame_ms` - Time between frames
    /// * `seed` - Seed for the noise generator
    pub fn new(
        ball: PolarCircular,
        marker: PolarCircular,
        noise_sigma: f64,
        dropout: f64,
        frame_ms: u64,
        seed: u64,
    ) -> Result<Self> {
        ensure!(frame_ms > 0, "frame interval must be positive");
        ensure!(
            (0.0..1.0).contains(&dropout),
            "dropout must be in [0, 1), got {dropout}"
        );
        ensure!(
            noise_sigma.is_finite() && noise_sigma >= 0.0,
            "noise sigma must be finite and non-negative, got {noise_sigma}"
        );
        let noise = Normal::new(0.0, noise_sigma)?;

        Ok(Self {
            ball,
            marker,
            noise,
            dropout,
            frame_ms,
            frame: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn ball(&self) -> &PolarCircular {
        &self.ball
    }

    pub fn marker(&self) -> &PolarCircular {
        &self.marker
    }

    fn observe(&mut self, path: Path, timestamp_ms: u64) -> Option<Sample> {
        if self.rng.random_bool(self.dropout) {
            return None;
        }
        let position = match path {
            Path::Ball => self.ball.position(timestamp_ms as f64),
            Path::Marker => self.marker.position(timestamp_ms as f64),
        };
        Some(Sample {
            position: add_noise(position, &self.noise, &mut self.rng),
            timestamp_ms,
        })
    }
}

#[derive(Clone, Copy)]
enum Path {
    Ball,
    Marker,
}

impl Iterator for WheelSimulation {
    /// Ball and marker observations of one frame
    type Item = (Option<Sample>, Option<Sample>);

    fn next(&mut self) -> Option<Self::Item> {
        let timestamp_ms = self.frame * self.frame_ms;
        self.frame += 1;
        let ball = self.observe(Path::Ball, timestamp_ms);
        let marker = self.observe(Path::Marker, timestamp_ms);
        Some((ball, marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar::to_polar;

    #[test]
    fn test_circular_state() {
        let center = Point2::new(100.0, 100.0);
        // 30 rpm is one revolution every 2 seconds
        let path = PolarCircular::new(center, 50.0, 30.0).with_start_angle(90.0);
        assert!((path.period_ms() - 2000.0).abs() < 1e-9);

        let state = path.state(500.0);
        assert!((state.angle - 180.0).abs() < 1e-9);
        assert_eq!(state.radius, 50.0);

        let polar = to_polar(&center, &path.position(1500.0));
        assert!((polar.angle - 360.0).abs() < 1e-6 || polar.angle < 1e-6);
        assert!((polar.radius - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_rotation_and_decay() {
        let path = PolarCircular::new(Point2::new(0.0, 0.0), 200.0, -60.0)
            .with_start_angle(10.0)
            .with_radius_decay(0.01, 150.0);

        let state = path.state(100.0);
        // 60 rpm is 0.36 degrees per ms
        assert!((state.angle - 334.0).abs() < 1e-9);
        assert!((state.radius - 199.0).abs() < 1e-9);
        assert_eq!(path.state(10_000.0).radius, 150.0);
    }

    #[test]
    fn test_simulation_is_reproducible() {
        let make = || {
            let center = Point2::new(400.0, 400.0);
            WheelSimulation::new(
                PolarCircular::new(center, 300.0, -45.0),
                PolarCircular::new(center, 150.0, 20.0),
                0.5,
                0.1,
                16,
                7,
            )
            .unwrap()
        };

        let first: Vec<_> = make().take(50).collect();
        let second: Vec<_> = make().take(50).collect();
        assert_eq!(first, second);

        let (ball, _) = first[3];
        if let Some(ball) = ball {
            assert_eq!(ball.timestamp_ms, 48);
        }
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let center = Point2::new(0.0, 0.0);
        let path = || PolarCircular::new(center, 10.0, 10.0);
        assert!(WheelSimulation::new(path(), path(), -1.0, 0.0, 16, 0).is_err());
        assert!(WheelSimulation::new(path(), path(), f64::NAN, 0.0, 16, 0).is_err());
        assert!(WheelSimulation::new(path(), path(), 0.0, 0.0, 16, 0).is_ok());
        assert!(WheelSimulation::new(path(), path(), 0.5, 1.0, 16, 0).is_err());
        assert!(WheelSimulation::new(path(), path(), 0.5, 0.0, 0, 0).is_err());
    }
}
