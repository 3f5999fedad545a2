use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{command, Parser};
use tracing::info;
use wheeltrack::simulation::{PolarCircular, WheelSimulation};
use wheeltrack::{plot::plot, Command, Entity, TrackerConfig, WheelTracker};

/// Time between frames
const FRAME_MS: u64 = 16;

/// How many seconds to simulate
const DURATION_S: f64 = 30.0;

/// Locator position noise (standard deviation)
const NOISE_SIGMA: f64 = 0.5;

/// Probability of a missed detection per object per frame
const DROPOUT: f64 = 0.05;

// Wheel Parameters
const MARKER_RADIUS: f64 = 150.0;
const MARKER_RPM: f64 = 20.0;

// Ball Parameters
const BALL_RADIUS: f64 = 320.0;
const BALL_MIN_RADIUS: f64 = 220.0;
const BALL_RPM: f64 = -60.0;
const BALL_RADIUS_DECAY_PER_MS: f64 = 0.003;

/// Name of the plot
const NAME: &str = "Revolution Durations";

/// Simulates a spinning wheel and times the ball and the zero marker
#[derive(Parser, Debug)]
#[command(name = "wheeltrack")]
struct Args {
    /// YAML tracker configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value_t = DURATION_S)]
    duration_s: f64,

    #[arg(short, long, default_value_t = NOISE_SIGMA)]
    noise_sigma: f64,

    #[arg(long, default_value_t = DROPOUT)]
    dropout: f64,

    #[arg(long, default_value_t = MARKER_RPM)]
    marker_rpm: f64,

    #[arg(long, default_value_t = BALL_RPM)]
    ball_rpm: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Reset tracking after this many seconds
    #[arg(long)]
    reset_at_s: Option<f64>,

    /// Write an SVG plot of the measured revolutions
    #[arg(short, long)]
    plot: Option<PathBuf>,
}

fn main() -> Result<()> {
    wheeltrack::init_logging("wheeltrack=info");

    // Parse the arguments
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };

    // The wheel sits slightly off the frame middle so recentering has work to do
    let true_center = config.initial_center() + nalgebra::Vector2::new(6.0, -4.0);
    let ball = PolarCircular::new(true_center, BALL_RADIUS, args.ball_rpm)
        .with_start_angle(30.0)
        .with_radius_decay(BALL_RADIUS_DECAY_PER_MS, BALL_MIN_RADIUS);
    let marker = PolarCircular::new(true_center, MARKER_RADIUS, args.marker_rpm)
        .with_start_angle(200.0);
    info!(
        "Ball period {:.0}ms, marker period {:.0}ms",
        ball.period_ms(),
        marker.period_ms()
    );

    let simulation = WheelSimulation::new(
        ball,
        marker,
        args.noise_sigma,
        args.dropout,
        FRAME_MS,
        args.seed,
    )?;
    let mut tracker = WheelTracker::new(&config);

    let frames = (args.duration_s * 1000.0 / FRAME_MS as f64) as usize;
    let reset_frame = args
        .reset_at_s
        .map(|s| (s * 1000.0 / FRAME_MS as f64) as usize);

    // Iterate over frames
    for (frame, (ball, marker)) in simulation.take(frames).enumerate() {
        if reset_frame == Some(frame) {
            tracker.apply(Command::Reset);
        }
        tracker.process(ball, marker);
    }

    // Print the results
    println!("------------------------- Marker -------------------------");
    println!("{}", tracker.duration_log(Entity::Marker));
    println!("\n------------------------- Ball ---------------------------");
    println!("{}", tracker.duration_log(Entity::Ball));
    println!("\n------------------------- Summary ------------------------");
    for entity in [Entity::Marker, Entity::Ball] {
        match tracker.lap_statistics(entity) {
            Some(stats) => println!(
                "{:<8} n={:<5} mean={:>8.1}ms  std={:>6.1}ms  min={:>6.0}ms  max={:>6.0}ms",
                entity.name(),
                stats.count,
                stats.mean_ms,
                stats.std_dev_ms,
                stats.min_ms,
                stats.max_ms
            ),
            None => println!("{:<8} no revolutions measured", entity.name()),
        }
    }
    println!("Drift events:                 {}", tracker.drift_events().len());
    let center = tracker.center();
    println!(
        "Center:                       ({:.2}, {:.2}), true ({:.2}, {:.2})",
        center.x, center.y, true_center.x, true_center.y
    );
    if let Some(pocket) = tracker.ball_pocket() {
        println!("Ball over pocket:             {pocket}");
    }

    // Plot the results
    if let Some(output) = &args.plot {
        plot(
            NAME,
            output,
            tracker.measurements(Entity::Ball),
            tracker.measurements(Entity::Marker),
        )
        .with_context(|| format!("writing plot to {}", output.display()))?;
        info!("Plot written to {}", output.display());
    }

    Ok(())
}
