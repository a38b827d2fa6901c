//! Chart Plotter Module
//! Creates the interactive line chart and bubble map using egui_plot.

use super::colors::{bubble_radius, normalize, series_color, viridis};
use crate::data::map::{format_volume, MapFrame};
use crate::data::timeseries::CategoryLine;
use chrono::{Datelike, NaiveDate};
use egui::{Color32, RichText};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

const BUBBLE_MIN_RADIUS: f32 = 4.0;
const BUBBLE_MAX_RADIUS: f32 = 25.0;
/// Clicks farther than this (in degrees) from every marker select nothing.
const CLICK_TOLERANCE_DEG: f64 = 6.0;

/// Visible date range of the line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Day number used as the x coordinate of a date.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

pub fn to_color32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Creates the dashboard's interactive charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// One line per category over time. Points outside `window` are hidden.
    pub fn draw_time_series(ui: &mut egui::Ui, lines: &[CategoryLine], window: Option<TimeWindow>) {
        // A new plot id whenever the window moves resets zoom to fit it
        let plot_id = match window {
            Some(w) => format!("timeseries_{}_{}", w.start, w.end),
            None => "timeseries_all".to_string(),
        };

        Plot::new(plot_id)
            .height(420.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Period")
            .y_axis_label("USD billions")
            .x_axis_formatter(|mark, _range| {
                x_to_date(mark.value)
                    .map(|d| d.format("%Y-%m").to_string())
                    .unwrap_or_default()
            })
            .label_formatter(|name, value| {
                let date = x_to_date(value.x)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                if name.is_empty() {
                    format!("{}\n{:.2}", date, value.y)
                } else {
                    format!("{}\n{}\n{:.2}", name, date, value.y)
                }
            })
            .show(ui, |plot_ui| {
                for (i, line) in lines.iter().enumerate() {
                    let color = to_color32(series_color(i));
                    // Segments share a name, so the legend shows one entry
                    for segment in &line.segments {
                        let points: Vec<[f64; 2]> = segment
                            .iter()
                            .filter(|(date, _)| window.map_or(true, |w| w.contains(*date)))
                            .map(|(date, value)| [date_to_x(*date), *value])
                            .collect();
                        if points.is_empty() {
                            continue;
                        }

                        plot_ui.line(
                            Line::new(PlotPoints::from(points))
                                .color(color)
                                .width(2.0)
                                .name(&line.category),
                        );
                    }
                }
            });
    }

    /// Bubble map of country volumes. Returns the country whose marker was
    /// clicked, if any.
    pub fn draw_map(ui: &mut egui::Ui, frame: &MapFrame) -> Option<String> {
        let (min, max) = frame.volume_range().unwrap_or((0.0, 0.0));
        let markers: Vec<(String, [f64; 2])> = frame
            .points
            .iter()
            .map(|p| (p.country.clone(), [p.longitude, p.latitude]))
            .collect();

        let response = Plot::new("geo_map")
            .height(460.0)
            .data_aspect(1.0)
            .include_x(-180.0)
            .include_x(180.0)
            .include_y(-60.0)
            .include_y(85.0)
            .allow_scroll(false)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .label_formatter(|name, _value| name.to_string())
            .show(ui, |plot_ui| {
                for point in &frame.points {
                    let color = to_color32(viridis(normalize(point.volume, min, max)));
                    let radius = bubble_radius(point.volume, max, BUBBLE_MIN_RADIUS, BUBBLE_MAX_RADIUS);

                    plot_ui.points(
                        Points::new(vec![[point.longitude, point.latitude]])
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(radius)
                            .color(color.gamma_multiply(0.85))
                            .name(format!("{}: {}", point.country, format_volume(point.volume))),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(point.longitude, point.latitude - 4.0),
                            RichText::new(&point.country).size(10.0),
                        )
                        .color(Color32::GRAY),
                    );
                }

                if !plot_ui.response().clicked() {
                    return None;
                }
                let pos = plot_ui.pointer_coordinate()?;
                nearest_marker(&markers, [pos.x, pos.y], CLICK_TOLERANCE_DEG)
            });

        response.inner
    }

    /// Horizontal color bar for the map's volume scale.
    pub fn draw_color_bar(ui: &mut egui::Ui, min: f64, max: f64) {
        const STEPS: usize = 40;
        const WIDTH: f32 = 300.0;
        const HEIGHT: f32 = 12.0;

        ui.horizontal(|ui| {
            ui.label(RichText::new(format_volume(min)).size(11.0));
            let (rect, _) = ui.allocate_exact_size(egui::vec2(WIDTH, HEIGHT), egui::Sense::hover());
            let step_width = WIDTH / STEPS as f32;
            for i in 0..STEPS {
                let t = i as f64 / (STEPS - 1) as f64;
                let left = rect.left() + i as f32 * step_width;
                let cell = egui::Rect::from_min_max(
                    egui::pos2(left, rect.top()),
                    egui::pos2(left + step_width + 0.5, rect.bottom()),
                );
                ui.painter().rect_filled(cell, 0.0, to_color32(viridis(t)));
            }
            ui.label(RichText::new(format_volume(max)).size(11.0));
        });
    }
}

/// Country of the marker closest to `pos`, within `tolerance`.
pub fn nearest_marker(markers: &[(String, [f64; 2])], pos: [f64; 2], tolerance: f64) -> Option<String> {
    markers
        .iter()
        .map(|(name, [x, y])| (name, (x - pos[0]).hypot(y - pos[1])))
        .filter(|(_, dist)| *dist <= tolerance)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(name, _)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(x_to_date(date_to_x(date)), Some(date));
        assert_eq!(x_to_date(f64::NAN), None);
    }

    #[test]
    fn window_is_inclusive() {
        let window = TimeWindow {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        };
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()));
    }

    #[test]
    fn nearest_marker_respects_tolerance() {
        let markers = vec![
            ("Japan".to_string(), [138.25, 36.20]),
            ("South Korea".to_string(), [127.98, 37.57]),
        ];
        assert_eq!(nearest_marker(&markers, [137.0, 35.0], 6.0), Some("Japan".to_string()));
        assert_eq!(nearest_marker(&markers, [0.0, 0.0], 6.0), None);
    }
}
