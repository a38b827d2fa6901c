//! Derivatives Dashboard - BIS derivative transactions explorer
//!
//! Loads the time-series, geographic and country URL tables, aggregates
//! volumes per country and serves the interactive dashboard views.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
