//! One-pass null audits over the dataset tables.
//!
//! Reported metrics arrive with gaps (late reporting, countries that
//! never publish a column). The audits count, per column, how many rows
//! are missing a value so a report consumer can judge how much weight a
//! derived metric deserves.

use serde::Serialize;

use crate::dataset::{CaseRow, VaxRow};

/// Per-column audit row: how many of `rows` are missing `column`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAudit {
    pub table: &'static str,
    pub column: &'static str,
    pub rows: usize,
    pub missing: usize,
    pub missing_pct: f64,
}

/// Missing-value counters for the case/death table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CaseTableAudit {
    pub rows: usize,
    pub missing_continent: usize,
    pub missing_population: usize,
    pub missing_total_cases: usize,
    pub missing_new_cases: usize,
    pub missing_total_deaths: usize,
    pub missing_new_deaths: usize,
}

impl CaseTableAudit {
    pub fn from_rows(rows: &[CaseRow]) -> Self {
        let mut audit = CaseTableAudit::default();
        audit.rows = rows.len();

        for row in rows {
            if row.continent.is_none() {
                audit.missing_continent += 1;
            }
            if row.population.is_none() {
                audit.missing_population += 1;
            }
            if row.total_cases.is_none() {
                audit.missing_total_cases += 1;
            }
            if row.new_cases.is_none() {
                audit.missing_new_cases += 1;
            }
            if row.total_deaths.is_none() {
                audit.missing_total_deaths += 1;
            }
            if row.new_deaths.is_none() {
                audit.missing_new_deaths += 1;
            }
        }

        audit
    }

    pub fn column_rows(&self) -> Vec<ColumnAudit> {
        let columns = [
            ("continent", self.missing_continent),
            ("population", self.missing_population),
            ("total_cases", self.missing_total_cases),
            ("new_cases", self.missing_new_cases),
            ("total_deaths", self.missing_total_deaths),
            ("new_deaths", self.missing_new_deaths),
        ];
        columns
            .into_iter()
            .map(|(column, missing)| ColumnAudit {
                table: "cases",
                column,
                rows: self.rows,
                missing,
                missing_pct: pct(missing, self.rows),
            })
            .collect()
    }
}

/// Missing-value counters for the testing/vaccination table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VaxTableAudit {
    pub rows: usize,
    pub missing_continent: usize,
    pub missing_new_tests: usize,
    pub missing_positive_rate: usize,
    pub missing_total_vaccinations: usize,
    pub missing_new_vaccinations: usize,
    pub missing_people_vaccinated: usize,
    pub missing_people_fully_vaccinated: usize,
}

impl VaxTableAudit {
    pub fn from_rows(rows: &[VaxRow]) -> Self {
        let mut audit = VaxTableAudit::default();
        audit.rows = rows.len();

        for row in rows {
            if row.continent.is_none() {
                audit.missing_continent += 1;
            }
            if row.new_tests.is_none() {
                audit.missing_new_tests += 1;
            }
            if row.positive_rate.is_none() {
                audit.missing_positive_rate += 1;
            }
            if row.total_vaccinations.is_none() {
                audit.missing_total_vaccinations += 1;
            }
            if row.new_vaccinations.is_none() {
                audit.missing_new_vaccinations += 1;
            }
            if row.people_vaccinated.is_none() {
                audit.missing_people_vaccinated += 1;
            }
            if row.people_fully_vaccinated.is_none() {
                audit.missing_people_fully_vaccinated += 1;
            }
        }

        audit
    }

    pub fn column_rows(&self) -> Vec<ColumnAudit> {
        let columns = [
            ("continent", self.missing_continent),
            ("new_tests", self.missing_new_tests),
            ("positive_rate", self.missing_positive_rate),
            ("total_vaccinations", self.missing_total_vaccinations),
            ("new_vaccinations", self.missing_new_vaccinations),
            ("people_vaccinated", self.missing_people_vaccinated),
            (
                "people_fully_vaccinated",
                self.missing_people_fully_vaccinated,
            ),
        ];
        columns
            .into_iter()
            .map(|(column, missing)| ColumnAudit {
                table: "vaccinations",
                column,
                rows: self.rows,
                missing,
                missing_pct: pct(missing, self.rows),
            })
            .collect()
    }
}

/// Share of `part` in `total` as a percentage; an empty table audits to
/// 0% missing rather than dividing by zero.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
