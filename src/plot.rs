use std::path::Path;

use anyhow::{ensure, Result};
use plotters::prelude::*;

use crate::types::Measurement;

/// Converts measurements into (seconds, duration ms) points
fn series(measurements: &[Measurement]) -> Vec<(f64, f64)> {
    measurements
        .iter()
        .map(|m| (m.timestamp_ms as f64 / 1000.0, m.lap_duration_ms as f64))
        .collect()
}

/// Plots revolution durations of the ball and the marker over time as an SVG
pub fn plot(
    name: &str,
    output: &Path,
    ball: &[Measurement],
    marker: &[Measurement],
) -> Result<()> {
    ensure!(
        !ball.is_empty() || !marker.is_empty(),
        "nothing to plot, no revolution was measured"
    );

    let ball_points = series(ball);
    let marker_points = series(marker);

    let all = ball_points.iter().chain(marker_points.iter());
    let (mut t_min, mut t_max) = (f64::MAX, f64::MIN);
    let (mut d_min, mut d_max) = (f64::MAX, f64::MIN);
    for (t, d) in all {
        t_min = t_min.min(*t);
        t_max = t_max.max(*t);
        d_min = d_min.min(*d);
        d_max = d_max.max(*d);
    }
    let d_margin = ((d_max - d_min) * 0.1).max(10.0);

    let root = SVGBackend::new(output, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(name, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(t_min..t_max.max(t_min + 1.0), (d_min - d_margin)..(d_max + d_margin))?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Revolution (ms)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(ball_points.iter().copied(), &RED))?
        .label("Ball")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart.draw_series(
        ball_points
            .iter()
            .map(|point| Circle::new(*point, 2, RED.filled())),
    )?;

    chart
        .draw_series(LineSeries::new(marker_points.iter().copied(), &BLUE))?
        .label("Marker")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    chart.draw_series(
        marker_points
            .iter()
            .map(|point| Circle::new(*point, 2, BLUE.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_converts_to_seconds() {
        let measurements = [Measurement {
            radius: 10.0,
            angle: 45.0,
            lap_duration_ms: 1200,
            timestamp_ms: 2500,
        }];
        assert_eq!(series(&measurements), vec![(2.5, 1200.0)]);
    }

    #[test]
    fn test_refuses_empty_plot() {
        let output = std::env::temp_dir().join("wheeltrack_empty_plot.svg");
        assert!(plot("empty", &output, &[], &[]).is_err());
    }
}
