//! Read-only access to the two-table COVID dataset.
//!
//! [`DatasetSource`] is the loader abstraction handed to the report
//! layer; [`CsvSource`] implements it over local CSV snapshots, gzipped
//! or plain. Loading is the only I/O the report pipeline performs on the
//! way in; everything downstream is a pure pass over [`CovidDataset`].

mod rows;

pub use rows::{CaseRow, VaxRow};

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// The table file could not be opened.
    #[error("failed to open {table} table at {}", path.display())]
    Open {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row failed CSV/field deserialization (bad shape, bad date).
    #[error("malformed {table} row {record}")]
    Malformed {
        table: &'static str,
        record: usize,
        #[source]
        source: csv::Error,
    },

    /// A row is missing its location key, which every partition and join
    /// depends on.
    #[error("{table} row {record} has an empty location")]
    MissingLocation { table: &'static str, record: usize },
}

/// Both tables of one dataset snapshot, already deserialized.
#[derive(Debug, Clone, Default)]
pub struct CovidDataset {
    pub cases: Vec<CaseRow>,
    pub vaccinations: Vec<VaxRow>,
}

impl CovidDataset {
    /// Lookup of vaccination rows by `(location, date)`, the join key
    /// shared by the two tables.
    pub fn vaccination_index(&self) -> HashMap<(&str, NaiveDate), &VaxRow> {
        self.vaccinations
            .iter()
            .map(|v| ((v.location.as_str(), v.date), v))
            .collect()
    }

    /// Inner join of the two tables on `(location, date)`, in case-table
    /// order. Case rows without a vaccination counterpart drop out.
    pub fn joined(&self) -> Vec<(&CaseRow, &VaxRow)> {
        let index = self.vaccination_index();
        self.cases
            .iter()
            .filter_map(|c| {
                index
                    .get(&(c.location.as_str(), c.date))
                    .map(|v| (c, *v))
            })
            .collect()
    }
}

/// Read-only repository handed to the report layer. Reports never reach
/// around it to touch storage directly.
pub trait DatasetSource {
    fn load(&self) -> Result<CovidDataset, DatasetError>;
}

/// Loads the dataset from two CSV snapshot files. Files ending in `.gz`
/// are decompressed on the fly.
pub struct CsvSource {
    cases_path: PathBuf,
    vaccinations_path: PathBuf,
}

impl CsvSource {
    pub fn new(cases_path: impl Into<PathBuf>, vaccinations_path: impl Into<PathBuf>) -> Self {
        CsvSource {
            cases_path: cases_path.into(),
            vaccinations_path: vaccinations_path.into(),
        }
    }
}

impl DatasetSource for CsvSource {
    fn load(&self) -> Result<CovidDataset, DatasetError> {
        let cases = load_table::<CaseRow>("cases", &self.cases_path)?;
        let vaccinations = load_table::<VaxRow>("vaccinations", &self.vaccinations_path)?;
        debug!(
            cases = cases.len(),
            vaccinations = vaccinations.len(),
            "Dataset loaded"
        );
        Ok(CovidDataset {
            cases,
            vaccinations,
        })
    }
}

/// Gives the loader access to the key column regardless of table shape.
trait TableRow: DeserializeOwned {
    fn location(&self) -> &str;
}

impl TableRow for CaseRow {
    fn location(&self) -> &str {
        &self.location
    }
}

impl TableRow for VaxRow {
    fn location(&self) -> &str {
        &self.location
    }
}

fn load_table<T: TableRow>(table: &'static str, path: &Path) -> Result<Vec<T>, DatasetError> {
    let reader = open_table(table, path)?;
    let mut rdr = csv::Reader::from_reader(reader);

    let mut out = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        // record numbers are 1-based and skip the header line
        let record = i + 1;
        let row: T = result.map_err(|source| DatasetError::Malformed {
            table,
            record,
            source,
        })?;
        if row.location().trim().is_empty() {
            return Err(DatasetError::MissingLocation { table, record });
        }
        out.push(row);
    }

    debug!(table, rows = out.len(), path = %path.display(), "Table read");
    Ok(out)
}

fn open_table(table: &'static str, path: &Path) -> Result<Box<dyn Read>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        table,
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}
