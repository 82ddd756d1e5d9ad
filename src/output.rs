//! Report persistence: CSV and JSON writers for any serializable row
//! set.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// On-disk representation of a written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}', expected csv or json")),
        }
    }
}

/// Writes report rows to `path` in the requested format.
pub fn write_rows<T: Serialize>(path: &Path, format: OutputFormat, rows: &[T]) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(path, rows),
        OutputFormat::Json => write_json(path, rows),
    }
}

/// Writes rows as CSV with a header derived from the row struct.
///
/// An empty report produces an empty file: the csv crate only learns the
/// header from the first serialized row.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV report");

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes rows as a pretty-printed JSON array.
pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing JSON report");

    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, rows)?;

    Ok(())
}
