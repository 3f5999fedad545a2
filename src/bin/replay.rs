use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{command, Parser};
use serde::Deserialize;
use tracing::{info, warn};
use wheeltrack::{Command, Entity, Sample, TrackerConfig, WheelTracker};

/// Replays recorded locator output through the tracker
///
/// Input is JSON lines, one frame per line:
/// `{"t_ms": 1016, "ball": [412.0, 96.5], "marker": null}`
/// or a command: `{"command": "reset"}`, `{"command": "toggle_tracking"}`.
#[derive(Parser, Debug)]
#[command(name = "replay")]
struct Args {
    /// Recording to replay, reads stdin when omitted
    input: Option<PathBuf>,

    /// YAML tracker configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the ball durations instead of the marker durations
    #[arg(short, long)]
    ball: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CommandName {
    Reset,
    ToggleTracking,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Line {
    Command {
        command: CommandName,
    },
    Frame {
        t_ms: u64,
        #[serde(default)]
        ball: Option<[f64; 2]>,
        #[serde(default)]
        marker: Option<[f64; 2]>,
    },
}

fn sample(position: Option<[f64; 2]>, t_ms: u64) -> Option<Sample> {
    position.and_then(|[x, y]| Sample::from_locator(x, y, t_ms))
}

fn main() -> Result<()> {
    wheeltrack::init_logging("wheeltrack=info,replay=info");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut tracker = WheelTracker::new(&config);
    let mut frames = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", number + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: Line = match serde_json::from_str(&line) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Skipping line {}: {}", number + 1, err);
                continue;
            }
        };

        match parsed {
            Line::Command { command } => tracker.apply(match command {
                CommandName::Reset => Command::Reset,
                CommandName::ToggleTracking => Command::ToggleTracking,
            }),
            Line::Frame { t_ms, ball, marker } => {
                tracker.process(sample(ball, t_ms), sample(marker, t_ms));
                frames += 1;
            }
        }
    }

    let entity = if args.ball { Entity::Ball } else { Entity::Marker };
    info!(
        "Replayed {} frames, {} {} revolutions measured",
        frames,
        tracker.measurements(entity).len(),
        entity.name()
    );
    println!("{}", tracker.duration_log(entity));

    Ok(())
}
