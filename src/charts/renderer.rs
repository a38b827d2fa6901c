//! Static Chart Renderer
//! Writes PNG snapshots of the line chart and the bubble map with plotters.

use super::colors::{bubble_radius, normalize, series_color, viridis};
use super::plotter::{date_to_x, x_to_date, TimeWindow};
use crate::data::map::{format_volume, MapFrame};
use crate::data::timeseries::CategoryLine;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

pub const SNAPSHOT_SIZE: (u32, u32) = (1400, 800);

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> SnapshotError {
    SnapshotError::Draw(e.to_string())
}

/// Renders chart snapshots to image files.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Line chart snapshot of the selected categories.
    pub fn render_time_series(
        lines: &[CategoryLine],
        window: Option<TimeWindow>,
        title: &str,
        path: &Path,
    ) -> Result<(), SnapshotError> {
        let series: Vec<(&str, Vec<Vec<(f64, f64)>>)> = lines
            .iter()
            .map(|line| {
                let segments = line
                    .segments
                    .iter()
                    .map(|segment| {
                        segment
                            .iter()
                            .filter(|(date, _)| window.map_or(true, |w| w.contains(*date)))
                            .map(|(date, value)| (date_to_x(*date), *value))
                            .collect::<Vec<_>>()
                    })
                    .filter(|points| !points.is_empty())
                    .collect();
                (line.category.as_str(), segments)
            })
            .collect();
        let (x_range, y_range) =
            Self::series_bounds(series.iter().flat_map(|(_, segments)| segments.iter().flatten()));

        let root = BitMapBackend::new(path, SNAPSHOT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|x| {
                x_to_date(*x)
                    .map(|d| d.format("%Y-%m").to_string())
                    .unwrap_or_default()
            })
            .x_desc("Period")
            .y_desc("USD billions")
            .draw()
            .map_err(draw_err)?;

        for (i, (name, segments)) in series.into_iter().enumerate() {
            let (r, g, b) = series_color(i);
            let color = RGBColor(r, g, b);
            for (j, points) in segments.into_iter().enumerate() {
                let mut drawn = chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(draw_err)?;
                // Legend entry once per category
                if j == 0 {
                    drawn.label(name).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                }
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        tracing::info!("Saved time-series snapshot to {}", path.display());
        Ok(())
    }

    /// Bubble map snapshot for one period.
    pub fn render_map(frame: &MapFrame, path: &Path) -> Result<(), SnapshotError> {
        let (min, max) = frame.volume_range().unwrap_or((0.0, 0.0));

        let root = BitMapBackend::new(path, SNAPSHOT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let title = format!(
            "Derivative Transactions {} (total {})",
            frame.period,
            format_volume(frame.total_volume)
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-180f64..180f64, -60f64..85f64)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(frame.points.iter().map(|p| {
                let (r, g, b) = viridis(normalize(p.volume, min, max));
                let radius = bubble_radius(p.volume, max, 4.0, 25.0).round() as i32;
                Circle::new((p.longitude, p.latitude), radius, RGBColor(r, g, b).mix(0.85).filled())
            }))
            .map_err(draw_err)?;

        chart
            .draw_series(frame.points.iter().map(|p| {
                Text::new(
                    p.country.clone(),
                    (p.longitude, p.latitude - 4.0),
                    ("sans-serif", 12).into_font().color(&BLACK),
                )
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        tracing::info!("Saved map snapshot to {}", path.display());
        Ok(())
    }

    /// Axis ranges covering every point, padded vertically by 5%.
    fn series_bounds<'a>(points: impl IntoIterator<Item = &'a (f64, f64)>) -> (Range<f64>, Range<f64>) {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for (x, y) in points {
            x_min = x_min.min(*x);
            x_max = x_max.max(*x);
            y_min = y_min.min(*y);
            y_max = y_max.max(*y);
        }

        if !x_min.is_finite() {
            return (0.0..1.0, 0.0..1.0);
        }
        if x_max <= x_min {
            x_max = x_min + 1.0;
        }
        let pad = ((y_max - y_min) * 0.05).max(1.0);
        (x_min..x_max, (y_min - pad)..(y_max + pad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_of_empty_series_are_unit_ranges() {
        let (x, y) = StaticChartRenderer::series_bounds(std::iter::empty());
        assert_eq!(x, 0.0..1.0);
        assert_eq!(y, 0.0..1.0);
    }

    #[test]
    fn bounds_cover_all_points() {
        let points = vec![(10.0, 5.0), (20.0, 100.0), (15.0, -5.0)];
        let (x, y) = StaticChartRenderer::series_bounds(&points);
        assert_eq!(x, 10.0..20.0);
        assert!(y.start < -5.0 && y.end > 100.0);
    }

    #[test]
    fn single_point_gets_nonempty_x_range() {
        let (x, _) = StaticChartRenderer::series_bounds(&[(10.0, 5.0)]);
        assert_eq!(x, 10.0..11.0);
    }
}
