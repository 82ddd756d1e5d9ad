//! Output row types for the report catalog.
//!
//! Every report serializes one of these per output row; the field order
//! here is the column order of the written CSV. Percentage columns are
//! `Option<f64>` wherever a denominator can be missing or zero, and such
//! rows keep an empty cell instead of failing the report.

use chrono::NaiveDate;
use serde::Serialize;

/// Knobs shared across the catalog. Reports ignore the ones they do not
/// take.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Trailing window length in rows (days) for the smoothed series.
    pub window: usize,
    /// Row cap for previews and rankings.
    pub limit: usize,
    /// Case-insensitive location substring filter.
    pub location: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            window: 7,
            limit: 10,
            location: None,
        }
    }
}

/// Raw first-look slice of the case table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    pub location: String,
    pub date: NaiveDate,
    pub total_cases: Option<i64>,
    pub new_cases: Option<i64>,
    pub total_deaths: Option<i64>,
    pub population: Option<i64>,
}

/// Likelihood of dying once infected, per location and day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeathRateRow {
    pub location: String,
    pub date: NaiveDate,
    pub total_cases: Option<i64>,
    pub total_deaths: Option<i64>,
    pub death_pct: Option<f64>,
}

/// Share of the population infected so far, per location and day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfectionRateRow {
    pub location: String,
    pub date: NaiveDate,
    pub population: Option<i64>,
    pub total_cases: Option<i64>,
    pub infected_pct: Option<f64>,
}

/// Daily new cases with the trailing window and running total attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingCasesRow {
    pub location: String,
    pub date: NaiveDate,
    pub new_cases: Option<i64>,
    pub window_sum: i64,
    pub window_avg: f64,
    pub cumulative_cases: i64,
}

/// Ranking entry: how much of a location's population was ever infected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfectionRankingRow {
    pub location: String,
    pub population: Option<i64>,
    pub peak_cases: Option<i64>,
    pub peak_infected_pct: Option<f64>,
}

/// Ranking entry: highest cumulative death count per location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeathRankingRow {
    pub location: String,
    pub peak_deaths: Option<i64>,
}

/// Highest cumulative death count among each continent's rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinentDeathsRow {
    pub continent: String,
    pub peak_deaths: Option<i64>,
}

/// Worldwide daily totals across country rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalDailyRow {
    pub date: NaiveDate,
    pub new_cases: i64,
    pub new_deaths: i64,
    pub death_pct: Option<f64>,
}

/// Worldwide overall totals, one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalTotalsRow {
    pub total_cases: i64,
    pub total_deaths: i64,
    pub death_pct: Option<f64>,
}

/// Per-day vaccination rollout: running doses against population.
///
/// `pct_vaccinated` is deliberately not clamped at 100: reporting lag
/// pushes some locations past it and the overshoot is part of the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolloutRow {
    pub continent: String,
    pub location: String,
    pub date: NaiveDate,
    pub population: Option<i64>,
    pub new_vaccinations: Option<i64>,
    pub rolling_people_vaccinated: i64,
    pub pct_vaccinated: Option<f64>,
}

/// Peak vaccination coverage per location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub location: String,
    pub population: Option<i64>,
    pub people_vaccinated: Option<i64>,
    pub people_fully_vaccinated: Option<i64>,
    pub people_vaccinated_per_hundred: Option<f64>,
    pub people_fully_vaccinated_per_hundred: Option<f64>,
    pub pct_vaccinated: Option<f64>,
    pub pct_fully_vaccinated: Option<f64>,
}

/// Test positivity over a trailing window, next to the published rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositivityRow {
    pub location: String,
    pub date: NaiveDate,
    pub new_tests: Option<i64>,
    pub window_tests: i64,
    pub window_cases: i64,
    pub positivity_pct: Option<f64>,
    pub reported_positive_pct: Option<f64>,
}
