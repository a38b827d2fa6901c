//! Charts module - Chart rendering

pub mod colors;
mod plotter;
mod renderer;

pub use plotter::{date_to_x, nearest_marker, x_to_date, ChartPlotter, TimeWindow};
pub use renderer::{SnapshotError, StaticChartRenderer, SNAPSHOT_SIZE};
