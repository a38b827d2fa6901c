//! CSV Export Module
//! Serializes frames to delimited text and writes downloads to disk.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a frame as CSV with a header row.
pub fn frame_to_csv(df: &mut DataFrame) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf).include_header(true).finish(df)?;
    Ok(buf)
}

/// Write prepared download bytes to `path`.
pub fn save_bytes(bytes: &[u8], path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, bytes)?;
    tracing::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// File name offered for a country's history download.
pub fn country_file_name(country: &str) -> String {
    format!("{}_transactions.csv", country)
}
