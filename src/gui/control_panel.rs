//! Control Panel Widget
//! Left side panel with page navigation and per-page settings.

use crate::data::lookup::PERIOD_OPTIONS;
use crate::data::map::format_volume;
use egui::{Color32, ComboBox, RichText, ScrollArea};

/// Dashboard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Info,
    TimeSeries,
    Geospatial,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Info, Page::TimeSeries, Page::Geospatial];

    pub fn title(self) -> &'static str {
        match self {
            Page::Info => "Info",
            Page::TimeSeries => "📈 Time Series Analysis",
            Page::Geospatial => "🌍 Geospatial Analysis",
        }
    }
}

/// User selections driving the views
#[derive(Debug, Clone)]
pub struct UserSettings {
    pub page: Page,
    /// Selected risk categories, in the order they were picked
    pub selected_categories: Vec<String>,
    pub period: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            page: Page::default(),
            selected_categories: Vec::new(),
            period: PERIOD_OPTIONS[0].to_string(),
        }
    }
}

/// Left side control panel with navigation and selection controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub categories: Vec<String>,
    /// Sum shown under the period selector
    pub period_total: Option<f64>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            categories: Vec::new(),
            period_total: None,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new(categories: Vec<String>) -> Self {
        let mut panel = Self::default();
        // First category selected by default
        panel.settings.selected_categories = categories.iter().take(1).cloned().collect();
        panel.categories = categories;
        panel
    }

    /// Toggle a category, keeping pick order.
    pub fn toggle_category(&mut self, category: &str, selected: bool) {
        let selection = &mut self.settings.selected_categories;
        let present = selection.iter().any(|c| c == category);
        if selected && !present {
            selection.push(category.to_string());
        } else if !selected && present {
            selection.retain(|c| c != category);
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌐 Derivatives Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("BIS derivative transactions")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Navigation =====
        ui.label(RichText::new("Navigation").size(14.0).strong());
        ui.add_space(5.0);
        for page in Page::ALL {
            if ui
                .radio_value(&mut self.settings.page, page, page.title())
                .changed()
            {
                action = ControlPanelAction::PageChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        match self.settings.page {
            Page::Info => {}
            Page::TimeSeries => {
                if self.show_category_settings(ui) {
                    action = ControlPanelAction::SelectionChanged;
                }
            }
            Page::Geospatial => {
                if self.show_period_settings(ui) {
                    action = ControlPanelAction::PeriodChanged;
                }
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") || self.status.contains("Failed") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn show_category_settings(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.label(RichText::new("⚙️ Settings").size(14.0).strong());
        ui.add_space(5.0);
        ui.label("Select Risk Category:");

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                    let categories = self.categories.clone();
                    for category in &categories {
                        let mut selected = self.settings.selected_categories.contains(category);
                        if ui.checkbox(&mut selected, category).changed() {
                            self.toggle_category(category, selected);
                            changed = true;
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                for category in self.categories.clone() {
                    self.toggle_category(&category, true);
                }
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                self.settings.selected_categories.clear();
                changed = true;
            }
        });

        changed
    }

    fn show_period_settings(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.label(RichText::new("📌 Select Time Period for Map").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("map_period")
            .width(150.0)
            .selected_text(&self.settings.period)
            .show_ui(ui, |ui| {
                for period in PERIOD_OPTIONS {
                    if ui
                        .selectable_label(self.settings.period == period, period)
                        .clicked()
                    {
                        self.settings.period = period.to_string();
                        changed = true;
                    }
                }
            });

        ui.add_space(8.0);
        if let Some(total) = self.period_total {
            ui.label(
                RichText::new(format!(
                    "Total Transactions ({}): {}",
                    self.settings.period,
                    format_volume(total)
                ))
                .strong(),
            );
        }

        changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    PageChanged,
    SelectionChanged,
    PeriodChanged,
}
