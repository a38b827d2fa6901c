//! GUI module - User interface components

mod app;
mod control_panel;
mod geo_page;
mod info_page;
mod time_series_page;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction, Page, UserSettings};
pub use geo_page::{GeoAction, GeoPage};
pub use time_series_page::{TimeSeriesAction, TimeSeriesPage};
