//! Case-table reports: previews, per-day percentage series, and the
//! smoothed daily-cases series.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::dataset::{CaseRow, CovidDataset};
use crate::filters;
use crate::rolling::{self, AggregateError, Observation};

use super::types::{DeathRateRow, InfectionRateRow, PreviewRow, RollingCasesRow};
use super::utility::{location_matches, ratio_pct, round2};

/// First `limit` rows of the case table in `(location, date)` order.
pub fn preview(dataset: &CovidDataset, limit: usize) -> Vec<PreviewRow> {
    let mut rows: Vec<&CaseRow> = dataset.cases.iter().collect();
    rows.sort_by(|a, b| a.location.cmp(&b.location).then(a.date.cmp(&b.date)));

    rows.into_iter()
        .take(limit)
        .map(|c| PreviewRow {
            location: c.location.clone(),
            date: c.date,
            total_cases: c.total_cases,
            new_cases: c.new_cases,
            total_deaths: c.total_deaths,
            population: c.population,
        })
        .collect()
}

/// Per-day share of confirmed cases that ended in death. Country rows
/// only (`has_continent`); `location` narrows to matching locations.
pub fn death_rate(dataset: &CovidDataset, location: Option<&str>) -> Vec<DeathRateRow> {
    let mut rows: Vec<&CaseRow> = dataset
        .cases
        .iter()
        .filter(|c| filters::has_continent(c.continent.as_deref()))
        .filter(|c| location_matches(&c.location, location))
        .collect();
    rows.sort_by(|a, b| a.location.cmp(&b.location).then(a.date.cmp(&b.date)));

    rows.into_iter()
        .map(|c| DeathRateRow {
            location: c.location.clone(),
            date: c.date,
            total_cases: c.total_cases,
            total_deaths: c.total_deaths,
            death_pct: ratio_pct(c.total_deaths, c.total_cases).map(round2),
        })
        .collect()
}

/// Per-day share of the population infected so far. No continent filter:
/// aggregate rows such as "World" chart alongside countries here, so the
/// series can be compared against the global curve.
pub fn infection_rate(dataset: &CovidDataset, location: Option<&str>) -> Vec<InfectionRateRow> {
    let mut rows: Vec<&CaseRow> = dataset
        .cases
        .iter()
        .filter(|c| location_matches(&c.location, location))
        .collect();
    rows.sort_by(|a, b| a.location.cmp(&b.location).then(a.date.cmp(&b.date)));

    rows.into_iter()
        .map(|c| InfectionRateRow {
            location: c.location.clone(),
            date: c.date,
            population: c.population,
            total_cases: c.total_cases,
            infected_pct: ratio_pct(c.total_cases, c.population).map(round2),
        })
        .collect()
}

/// Daily new cases per country with the trailing `window`-day sum and
/// average plus the running total. Country rows only (`has_continent`).
///
/// # Errors
///
/// Fails with [`AggregateError::InvalidWindow`] when `window` is 0.
pub fn rolling_cases(
    dataset: &CovidDataset,
    window: usize,
) -> Result<Vec<RollingCasesRow>, AggregateError> {
    let country_rows: Vec<&CaseRow> = dataset
        .cases
        .iter()
        .filter(|c| filters::has_continent(c.continent.as_deref()))
        .collect();

    let observations: Vec<Observation> = country_rows
        .iter()
        .map(|c| Observation::new(c.location.clone(), c.date, c.new_cases))
        .collect();

    let raw: HashMap<(&str, NaiveDate), Option<i64>> = country_rows
        .iter()
        .map(|c| ((c.location.as_str(), c.date), c.new_cases))
        .collect();

    let results = rolling::rolling_aggregate(&observations, window)?;

    Ok(results
        .into_iter()
        .map(|r| {
            let new_cases = raw
                .get(&(r.partition_key.as_str(), r.timestamp))
                .copied()
                .flatten();
            RollingCasesRow {
                location: r.partition_key,
                date: r.timestamp,
                new_cases,
                window_sum: r.windowed_sum,
                window_avg: r.windowed_avg,
                cumulative_cases: r.cumulative.unwrap_or(0),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn case_row(
        continent: Option<&str>,
        location: &str,
        date: &str,
        population: Option<i64>,
        total_cases: Option<i64>,
        new_cases: Option<i64>,
        total_deaths: Option<i64>,
    ) -> CaseRow {
        CaseRow {
            continent: continent.map(str::to_string),
            location: location.to_string(),
            date: day(date),
            population,
            total_cases,
            new_cases,
            total_deaths,
            new_deaths: None,
        }
    }

    fn dataset(cases: Vec<CaseRow>) -> CovidDataset {
        CovidDataset {
            cases,
            vaccinations: Vec::new(),
        }
    }

    #[test]
    fn test_preview_orders_and_limits() {
        let ds = dataset(vec![
            case_row(Some("Europe"), "Albania", "2021-01-02", None, None, None, None),
            case_row(Some("Africa"), "Zimbabwe", "2021-01-01", None, None, None, None),
            case_row(Some("Europe"), "Albania", "2021-01-01", None, None, None, None),
        ]);

        let rows = preview(&ds, 2);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, "Albania");
        assert_eq!(rows[0].date, day("2021-01-01"));
        assert_eq!(rows[1].date, day("2021-01-02"));
    }

    #[test]
    fn test_death_rate_divides_deaths_by_cases() {
        let ds = dataset(vec![case_row(
            Some("Europe"),
            "Albania",
            "2021-01-01",
            Some(2_877_797),
            Some(1000),
            Some(50),
            Some(25),
        )]);

        let rows = death_rate(&ds, None);

        assert_eq!(rows[0].death_pct, Some(2.5));
    }

    #[test]
    fn test_death_rate_skips_aggregate_rows_and_filters_location() {
        let ds = dataset(vec![
            case_row(None, "World", "2021-01-01", None, Some(10), None, Some(1)),
            case_row(
                Some("North America"),
                "United States",
                "2021-01-01",
                None,
                Some(100),
                None,
                Some(2),
            ),
            case_row(Some("Europe"), "Albania", "2021-01-01", None, Some(100), None, Some(2)),
        ]);

        let rows = death_rate(&ds, Some("states"));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location, "United States");
    }

    #[test]
    fn test_death_rate_with_zero_cases_is_empty_cell() {
        let ds = dataset(vec![case_row(
            Some("Europe"),
            "Albania",
            "2021-01-01",
            None,
            Some(0),
            None,
            Some(0),
        )]);

        let rows = death_rate(&ds, None);

        assert_eq!(rows[0].death_pct, None);
    }

    #[test]
    fn test_infection_rate_keeps_world_aggregate() {
        let ds = dataset(vec![
            case_row(None, "World", "2021-01-01", Some(1000), Some(100), None, None),
            case_row(Some("Europe"), "Albania", "2021-01-01", Some(200), Some(5), None, None),
        ]);

        let rows = infection_rate(&ds, None);

        assert_eq!(rows.len(), 2);
        let world = rows.iter().find(|r| r.location == "World").unwrap();
        assert_eq!(world.infected_pct, Some(10.0));
    }

    #[test]
    fn test_rolling_cases_window_and_cumulative() {
        let ds = dataset(vec![
            case_row(Some("Europe"), "Albania", "2021-01-01", None, None, Some(10), None),
            case_row(Some("Europe"), "Albania", "2021-01-02", None, None, Some(20), None),
            case_row(Some("Europe"), "Albania", "2021-01-03", None, None, Some(30), None),
        ]);

        let rows = rolling_cases(&ds, 2).unwrap();

        assert_eq!(rows[2].new_cases, Some(30));
        assert_eq!(rows[2].window_sum, 50);
        assert_eq!(rows[2].window_avg, 25.0);
        assert_eq!(rows[2].cumulative_cases, 60);
    }

    #[test]
    fn test_rolling_cases_rejects_zero_window() {
        let ds = dataset(Vec::new());
        assert_eq!(
            rolling_cases(&ds, 0).unwrap_err(),
            AggregateError::InvalidWindow(0)
        );
    }

    #[test]
    fn test_rolling_cases_excludes_aggregate_rows() {
        let ds = dataset(vec![
            case_row(None, "World", "2021-01-01", None, None, Some(1000), None),
            case_row(Some("Europe"), "Albania", "2021-01-01", None, None, Some(10), None),
        ]);

        let rows = rolling_cases(&ds, 7).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location, "Albania");
    }
}
