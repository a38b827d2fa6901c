//! Geospatial Page
//! Bubble map of per-country volumes plus the country history drill-down.

use super::info_page::SOURCE_NOTE;
use crate::charts::ChartPlotter;
use crate::data::drilldown::{CountryHistory, DrillDown};
use crate::data::loader::any_to_string;
use crate::data::map::MapFrame;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use polars::prelude::DataFrame;

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 145, 56);

/// Actions requested from the geospatial page
#[derive(Debug, Clone, PartialEq)]
pub enum GeoAction {
    None,
    /// A country was picked and its history should be fetched
    FetchCountry(String),
    DownloadHistory,
    SaveSnapshot,
}

/// Drill-down state of the geospatial page.
#[derive(Default)]
pub struct GeoPage {
    pub selected_country: Option<String>,
    /// Country whose result is shown below (or is being fetched)
    pub requested_country: Option<String>,
    pub result: Option<DrillDown>,
    pub is_fetching: bool,
}

impl GeoPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished drill-down if it still belongs to the selection.
    pub fn set_result(&mut self, country: &str, result: DrillDown) {
        if self.requested_country.as_deref() == Some(country) {
            self.result = Some(result);
            self.is_fetching = false;
        }
    }

    pub fn history(&self) -> Option<&CountryHistory> {
        match &self.result {
            Some(DrillDown::Ready(history)) => Some(history),
            _ => None,
        }
    }

    /// Keep the selection valid for the countries on the current map;
    /// falls back to the first one.
    fn sync_selection(&mut self, countries: &[String]) {
        let valid = self
            .selected_country
            .as_ref()
            .is_some_and(|c| countries.contains(c));
        if !valid {
            self.selected_country = countries.first().cloned();
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, frame: &MapFrame, map_warning: Option<&str>) -> GeoAction {
        let mut action = GeoAction::None;

        ui.heading(RichText::new("🌍 Global Derivative Transactions Map").size(24.0));
        ui.add_space(6.0);

        if let Some(warning) = map_warning {
            ui.colored_label(WARNING_COLOR, format!("⚠ {}", warning));
        }

        let countries = frame.countries();
        self.sync_selection(&countries);

        if let Some(clicked) = ChartPlotter::draw_map(ui, frame) {
            self.selected_country = Some(clicked);
        }
        if let Some((min, max)) = frame.volume_range() {
            ChartPlotter::draw_color_bar(ui, min, max);
        }

        ui.add_space(6.0);
        if ui.button("🖼 Save Map as PNG").clicked() {
            action = GeoAction::SaveSnapshot;
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label("Select a Country:");
            ComboBox::from_id_salt("drilldown_country")
                .width(200.0)
                .selected_text(self.selected_country.clone().unwrap_or_default())
                .show_ui(ui, |ui| {
                    for country in &countries {
                        ui.selectable_value(&mut self.selected_country, Some(country.clone()), country);
                    }
                });
        });

        // Selecting a country fetches its history right away
        if let Some(country) = &self.selected_country {
            if self.requested_country.as_ref() != Some(country) && !self.is_fetching {
                self.requested_country = Some(country.clone());
                self.result = None;
                self.is_fetching = true;
                action = GeoAction::FetchCountry(country.clone());
            }
        }

        ui.add_space(8.0);
        if self.is_fetching {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!(
                    "Fetching data for {}...",
                    self.requested_country.as_deref().unwrap_or_default()
                ));
            });
        }

        match &self.result {
            Some(DrillDown::Warning(msg)) => {
                ui.colored_label(WARNING_COLOR, format!("⚠ {}", msg));
            }
            Some(DrillDown::Ready(history)) => {
                if ui
                    .button(format!("📥 Download {} Data", history.country))
                    .clicked()
                {
                    action = GeoAction::DownloadHistory;
                }
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!("📃 {} - Historical Transactions", history.country))
                        .size(18.0)
                        .strong(),
                );
                show_frame_preview(ui, &history.preview());
            }
            None => {}
        }

        ui.add_space(10.0);
        ui.label(RichText::new(SOURCE_NOTE).italics());

        action
    }
}

/// Grid view of a small frame.
fn show_frame_preview(ui: &mut egui::Ui, df: &DataFrame) {
    ScrollArea::both()
        .id_salt("history_preview")
        .max_height(300.0)
        .show(ui, |ui| {
            egui::Grid::new("history_preview_grid")
                .striped(true)
                .min_col_width(80.0)
                .show(ui, |ui| {
                    for name in df.get_column_names() {
                        ui.label(RichText::new(name.as_str()).strong());
                    }
                    ui.end_row();

                    for i in 0..df.height() {
                        for col in df.get_columns() {
                            let text = col.get(i).ok().and_then(any_to_string).unwrap_or_default();
                            ui.label(text);
                        }
                        ui.end_row();
                    }
                });
        });
}
