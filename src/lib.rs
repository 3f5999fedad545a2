//! Revolution timing for a ball and a marker circling a wheel.
//!
//! Position samples are projected into a polar frame about a self-correcting wheel
//! center. Each tracked object keeps the lap in progress and the last completed lap;
//! every new sample is timed and drift-checked against the completed lap.

pub mod bracket;
pub mod center;
pub mod config;
pub mod crossing;
pub mod drift;
pub mod engine;
pub mod lap;
pub mod plot;
pub mod pockets;
pub mod polar;
pub mod simulation;
pub mod stats;
pub mod timing;
pub mod tracking;
pub mod types;


pub use config::TrackerConfig;
pub use engine::{Command, CycleReport, WheelTracker};
pub use polar::{angle_difference, from_polar, to_polar, PolarCoord};
pub use types::{DriftEvent, Entity, Measurement, Sample};

/// Installs the fmt subscriber used by the binaries, `RUST_LOG` overrides `default_filter`
pub fn init_logging(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
