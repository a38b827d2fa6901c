//! Dashboard Main Application
//! Main window with control panel and the active page.

use crate::charts::StaticChartRenderer;
use crate::data::drilldown::{drill_down, fetch_failed_warning, DrillDown, HttpHistorySource};
use crate::data::export::save_bytes;
use crate::data::map::MapFrame;
use crate::data::Dataset;
use crate::gui::control_panel::Page;
use crate::gui::geo_page::{GeoAction, GeoPage};
use crate::gui::time_series_page::{TimeSeriesAction, TimeSeriesPage};
use crate::gui::{info_page, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Drill-down result from background thread
struct FetchResult {
    country: String,
    outcome: DrillDown,
}

/// Main application window.
pub struct DashboardApp {
    dataset: Arc<Dataset>,
    control_panel: ControlPanel,
    time_series_page: TimeSeriesPage,
    geo_page: GeoPage,
    fetch_timeout: Duration,

    // Async drill-down fetch
    fetch_rx: Option<Receiver<FetchResult>>,

    last_saved: Option<PathBuf>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset: Dataset, fetch_timeout: Duration) -> Self {
        let categories = dataset.time_series.categories().to_vec();
        Self {
            dataset: Arc::new(dataset),
            control_panel: ControlPanel::new(categories),
            time_series_page: TimeSeriesPage::new(),
            geo_page: GeoPage::new(),
            fetch_timeout,
            fetch_rx: None,
            last_saved: None,
        }
    }

    /// Map for the selected period; an unknown period gives an empty map
    /// and a warning instead of failing the page.
    fn current_map(&self) -> (MapFrame, Option<String>) {
        let period = &self.control_panel.settings.period;
        match self.dataset.map_frame(period) {
            Ok(frame) => (frame, None),
            Err(e) => {
                tracing::warn!("{}", e);
                (MapFrame::empty(period), Some(e.to_string()))
            }
        }
    }

    /// Fetch a country's history in a background thread
    fn start_fetch(&mut self, country: String) {
        let (tx, rx) = channel();
        self.fetch_rx = Some(rx);

        let dataset = Arc::clone(&self.dataset);
        let timeout = self.fetch_timeout;

        thread::spawn(move || {
            let outcome = match HttpHistorySource::new(timeout) {
                Ok(source) => drill_down(&country, &dataset.currency_urls, &source),
                Err(e) => {
                    tracing::warn!("Could not build HTTP client: {}", e);
                    DrillDown::Warning(fetch_failed_warning(&country))
                }
            };
            let _ = tx.send(FetchResult { country, outcome });
        });
    }

    /// Check for drill-down results
    fn check_fetch_results(&mut self) {
        let rx = self.fetch_rx.take();
        if let Some(rx) = rx {
            match rx.try_recv() {
                Ok(result) => {
                    self.geo_page.set_result(&result.country, result.outcome);
                }
                Err(std::sync::mpsc::TryRecvError::Empty) => {
                    self.fetch_rx = Some(rx);
                }
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    self.geo_page.is_fetching = false;
                }
            }
        }
    }

    fn pick_save_path(filter: &str, extensions: &[&str], file_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter, extensions)
            .set_file_name(file_name)
            .save_file()
    }

    fn save_download(&mut self, bytes: &[u8], file_name: &str) {
        let Some(path) = Self::pick_save_path("CSV Files", &["csv"], file_name) else {
            return; // User cancelled
        };
        match save_bytes(bytes, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Saved {}", path.display()));
                self.last_saved = Some(path);
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_download_time_series(&mut self) {
        let selected = self.control_panel.settings.selected_categories.clone();
        match self.dataset.time_series.export_csv(&selected) {
            Ok(bytes) => self.save_download(&bytes, "filtered_data.csv"),
            Err(e) => self.control_panel.set_status(&format!("Error: {}", e)),
        }
    }

    fn handle_download_history(&mut self) {
        let Some(history) = self.geo_page.history().cloned() else {
            return;
        };
        self.save_download(&history.csv, &history.file_name());
    }

    fn handle_time_series_snapshot(&mut self) {
        let Some(path) = Self::pick_save_path("PNG Image", &["png"], "time_series.png") else {
            return;
        };
        let selected = &self.control_panel.settings.selected_categories;
        let series = &self.dataset.time_series;
        let lines = series.lines(selected);
        let window = self.time_series_page.window(series);

        let result = StaticChartRenderer::render_time_series(
            &lines,
            window,
            "Global Derivative Transactions by Risk Category",
            &path,
        );
        self.report_snapshot(result, path);
    }

    fn handle_map_snapshot(&mut self) {
        let file_name = format!("map_{}.png", self.control_panel.settings.period);
        let Some(path) = Self::pick_save_path("PNG Image", &["png"], &file_name) else {
            return;
        };
        let (frame, _) = self.current_map();
        let result = StaticChartRenderer::render_map(&frame, &path);
        self.report_snapshot(result, path);
    }

    fn report_snapshot(&mut self, result: Result<(), crate::charts::SnapshotError>, path: PathBuf) {
        match result {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Saved {}", path.display()));
                self.last_saved = Some(path);
            }
            Err(e) => {
                tracing::error!("Snapshot failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn open_last_saved(&mut self) {
        if let Some(path) = &self.last_saved {
            if let Err(e) = open::that(path) {
                tracing::warn!("Could not open {}: {}", path.display(), e);
                self.control_panel
                    .set_status(&format!("Failed to open {}", path.display()));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_fetch_results();

        // Request repaint while fetching
        if self.geo_page.is_fetching {
            ctx.request_repaint();
        }

        let (map_frame, map_warning) = self.current_map();
        self.control_panel.period_total = Some(map_frame.total_volume);

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::PageChanged => {
                            tracing::debug!("Page: {:?}", self.control_panel.settings.page);
                        }
                        ControlPanelAction::SelectionChanged | ControlPanelAction::PeriodChanged => {}
                        ControlPanelAction::None => {}
                    }

                    if self.last_saved.is_some() && ui.small_button("📂 Open last saved file").clicked() {
                        self.open_last_saved();
                    }
                });
            });

        // Central panel - active page
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.control_panel.settings.page {
                    Page::Info => info_page::show(ui),
                    Page::TimeSeries => {
                        let selected = self.control_panel.settings.selected_categories.clone();
                        let action = self
                            .time_series_page
                            .show(ui, &self.dataset.time_series, &selected);
                        match action {
                            TimeSeriesAction::DownloadCsv => self.handle_download_time_series(),
                            TimeSeriesAction::SaveSnapshot => self.handle_time_series_snapshot(),
                            TimeSeriesAction::None => {}
                        }
                    }
                    Page::Geospatial => {
                        let action = self.geo_page.show(ui, &map_frame, map_warning.as_deref());
                        match action {
                            GeoAction::FetchCountry(country) => self.start_fetch(country),
                            GeoAction::DownloadHistory => self.handle_download_history(),
                            GeoAction::SaveSnapshot => self.handle_map_snapshot(),
                            GeoAction::None => {}
                        }
                    }
                });
        });
    }
}
