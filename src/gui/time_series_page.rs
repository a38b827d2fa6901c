//! Time Series Page
//! Line chart of the selected risk categories with a date range control,
//! data preview and download actions.

use super::info_page::SOURCE_NOTE;
use crate::charts::{date_to_x, x_to_date, ChartPlotter, TimeWindow};
use crate::data::loader::CATEGORY_COL;
use crate::data::timeseries::TimeSeries;
use egui::{RichText, ScrollArea};

const PREVIEW_ROW_HEIGHT: f32 = 18.0;

/// Actions requested from the time-series page
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSeriesAction {
    None,
    DownloadCsv,
    SaveSnapshot,
}

/// Range control state, in day numbers.
#[derive(Default)]
pub struct TimeSeriesPage {
    range: Option<(i32, i32)>,
}

impl TimeSeriesPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current visible window, defaulting to the full extent of the data.
    pub fn window(&self, series: &TimeSeries) -> Option<TimeWindow> {
        let (first, last) = series.date_extent()?;
        let (start, end) = self
            .range
            .unwrap_or((date_to_x(first) as i32, date_to_x(last) as i32));
        Some(TimeWindow {
            start: x_to_date(start as f64)?,
            end: x_to_date(end as f64)?,
        })
    }

    pub fn show(&mut self, ui: &mut egui::Ui, series: &TimeSeries, selected: &[String]) -> TimeSeriesAction {
        let mut action = TimeSeriesAction::None;

        ui.heading(RichText::new(format!("📈 Global Derivative Transactions by {}", CATEGORY_COL)).size(24.0));
        ui.label("This dashboard provides an overview of global derivative transactions by risk category.");
        ui.label(RichText::new("Calculation index: Turnover - notional amounts (daily average) in USD billions.").strong());
        ui.add_space(8.0);

        let lines = series.lines(selected);
        let window = self.window(series);
        ChartPlotter::draw_time_series(ui, &lines, window);

        self.show_range_control(ui, series);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("🖼 Save Chart as PNG").clicked() {
                action = TimeSeriesAction::SaveSnapshot;
            }
        });

        ui.add_space(12.0);
        ui.label(RichText::new("📃 Data Preview").size(18.0).strong());
        if ui.button("📥 Download Data").clicked() {
            action = TimeSeriesAction::DownloadCsv;
        }
        ui.add_space(5.0);

        let rows = series.filter(selected);
        ScrollArea::both()
            .id_salt("timeseries_preview")
            .max_height(300.0)
            .show_rows(ui, PREVIEW_ROW_HEIGHT, rows.len() + 1, |ui, row_range| {
                egui::Grid::new("timeseries_preview_grid")
                    .striped(true)
                    .min_col_width(120.0)
                    .show(ui, |ui| {
                        for idx in row_range {
                            if idx == 0 {
                                ui.label(RichText::new("period").strong());
                                ui.label(RichText::new("value").strong());
                                ui.label(RichText::new(CATEGORY_COL).strong());
                                ui.end_row();
                                continue;
                            }
                            let row = rows[idx - 1];
                            ui.label(row.period.format("%Y-%m-%d").to_string());
                            ui.label(row.value.map(|v| format!("{:.3}", v)).unwrap_or_default());
                            ui.label(&row.risk_category);
                            ui.end_row();
                        }
                    });
            });

        ui.add_space(10.0);
        ui.label(RichText::new(SOURCE_NOTE).italics());

        action
    }

    fn show_range_control(&mut self, ui: &mut egui::Ui, series: &TimeSeries) {
        let Some((first, last)) = series.date_extent() else {
            return;
        };
        let min = date_to_x(first) as i32;
        let max = date_to_x(last) as i32;
        let (mut start, mut end) = self.range.unwrap_or((min, max));

        ui.horizontal(|ui| {
            ui.label("Range:");
            ui.add(egui::Slider::new(&mut start, min..=max).show_value(false));
            ui.label(x_to_date(start as f64).map(|d| d.to_string()).unwrap_or_default());
            ui.label("to");
            ui.add(egui::Slider::new(&mut end, min..=max).show_value(false));
            ui.label(x_to_date(end as f64).map(|d| d.to_string()).unwrap_or_default());
            if ui.small_button("Reset").clicked() {
                start = min;
                end = max;
            }
        });

        // Keep the window ordered when the handles cross
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        self.range = Some((start, end));
    }
}
