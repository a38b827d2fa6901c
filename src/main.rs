//! Derivatives Dashboard - BIS derivative transactions explorer
//!
//! Desktop dashboard for global derivative transactions by risk category
//! and by country.

use anyhow::{anyhow, Context};
use derivatives_dashboard::config::{init_tracing, Config};
use derivatives_dashboard::data::Dataset;
use derivatives_dashboard::gui::DashboardApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);

    let dataset = Dataset::load(&config).with_context(|| {
        format!(
            "Failed to load input data ({}, {}, {})",
            config.timeseries_path.display(),
            config.geo_path.display(),
            config.url_list_path.display()
        )
    })?;
    tracing::info!(
        "Loaded {} time-series rows and {} currency URLs",
        dataset.time_series.rows().len(),
        dataset.currency_urls.len()
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("Global Derivative Transactions Dashboard"),
        ..Default::default()
    };

    let fetch_timeout = config.fetch_timeout;
    eframe::run_native(
        "Derivatives Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, dataset, fetch_timeout)))),
    )
    .map_err(|e| anyhow!("Dashboard window failed: {}", e))
}
