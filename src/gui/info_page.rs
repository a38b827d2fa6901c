//! Info Page
//! Static overview of the data source and the analysis pages.

use egui::RichText;

pub const SOURCE_NOTE: &str = "📌 The data is sourced from the Bank for International Settlements (BIS).";

pub fn show(ui: &mut egui::Ui) {
    ui.heading(RichText::new("Global Derivative Transactions Dashboard").size(26.0));
    ui.add_space(10.0);

    ui.label(RichText::new("🌍 Overview").size(20.0).strong());
    ui.label(RichText::new("Data Source: The data is sourced from the Bank for International Settlements (BIS).").italics());
    ui.label("This dashboard lets you explore global derivative transactions through interactive visualizations.");
    ui.add_space(12.0);

    section(
        ui,
        "🔹 Time Series Analysis",
        &[
            "Description: examines derivative transaction trends across risk categories.",
            "Included data: turnover - notional amounts (daily average) in USD billions.",
            "Time range: covers multiple historical periods.",
            "Usage: select risk categories in the sidebar, hover over the lines for \
             transaction details, and use the range sliders to zoom into a timeframe.",
        ],
    );

    section(
        ui,
        "🔹 Geospatial Analysis",
        &[
            "Description: displays country-level derivative transaction volumes on a map.",
            "Included data: aggregated transactions per country in USD billions.",
            "Available time periods: 2023-Q4, 2024-Q2, 2024-Q3.",
            "Usage: select a time period in the sidebar, hover over a country to see its \
             volume, and click a country to download its historical transaction data \
             (if available).",
        ],
    );

    ui.label(RichText::new("🛠 Navigation: use the left sidebar to switch between analysis pages.").strong());
}

fn section(ui: &mut egui::Ui, title: &str, bullets: &[&str]) {
    ui.label(RichText::new(title).size(17.0).strong());
    for bullet in bullets {
        ui.horizontal_wrapped(|ui| {
            ui.label("•");
            ui.label(*bullet);
        });
    }
    ui.add_space(12.0);
}
