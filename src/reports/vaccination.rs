//! Vaccination reports: the per-day rollout curve and the per-location
//! coverage summary.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::dataset::{CaseRow, CovidDataset, VaxRow};
use crate::filters;
use crate::rolling::{self, Observation};

use super::types::{CoverageRow, RolloutRow};
use super::utility::{max_rate, ratio_pct, round2};

/// Per-day rollout: running count of administered doses per location
/// next to its population share. Joins the two tables on
/// `(location, date)`, country rows only (`has_continent`).
///
/// `pct_vaccinated` divides the running dose count by population without
/// clamping, so locations can exceed 100 once boosters and reporting lag
/// pile up.
pub fn vaccination_rollout(dataset: &CovidDataset) -> Vec<RolloutRow> {
    let joined: Vec<(&CaseRow, &VaxRow)> = dataset
        .joined()
        .into_iter()
        .filter(|(c, _)| filters::has_continent(c.continent.as_deref()))
        .collect();

    let observations: Vec<Observation> = joined
        .iter()
        .map(|(c, v)| Observation::new(c.location.clone(), c.date, v.new_vaccinations))
        .collect();

    let index: HashMap<(&str, NaiveDate), (&CaseRow, &VaxRow)> = joined
        .iter()
        .map(|(c, v)| ((c.location.as_str(), c.date), (*c, *v)))
        .collect();

    rolling::cumulative_sum(&observations)
        .into_iter()
        .filter_map(|r| {
            let (case, vax) = index.get(&(r.partition_key.as_str(), r.timestamp)).copied()?;
            Some(RolloutRow {
                continent: case.continent.clone().unwrap_or_default(),
                location: r.partition_key,
                date: r.timestamp,
                population: case.population,
                new_vaccinations: vax.new_vaccinations,
                rolling_people_vaccinated: r.cumulative.unwrap_or(0),
                pct_vaccinated: ratio_pct(r.cumulative, case.population),
            })
        })
        .collect()
}

/// Peak coverage per location: the highest reported headcounts and
/// per-hundred figures across its rows, plus the same shares recomputed
/// against population. The columns are cumulative, so the peak is the
/// latest reported value while riding out days the location skipped.
/// Country rows only (`has_continent`), sorted by location.
pub fn vaccination_coverage(dataset: &CovidDataset) -> Vec<CoverageRow> {
    let population: HashMap<&str, Option<i64>> =
        dataset
            .cases
            .iter()
            .fold(HashMap::new(), |mut acc, row| {
                let entry = acc.entry(row.location.as_str()).or_insert(None);
                *entry = (*entry).max(row.population);
                acc
            });

    #[derive(Default)]
    struct Peaks {
        people_vaccinated: Option<i64>,
        people_fully_vaccinated: Option<i64>,
        vaccinated_per_hundred: Option<f64>,
        fully_vaccinated_per_hundred: Option<f64>,
    }

    let mut groups: BTreeMap<&str, Peaks> = BTreeMap::new();

    for row in &dataset.vaccinations {
        if !filters::has_continent(row.continent.as_deref()) {
            continue;
        }
        let entry = groups.entry(row.location.as_str()).or_default();
        entry.people_vaccinated = entry.people_vaccinated.max(row.people_vaccinated);
        entry.people_fully_vaccinated = entry
            .people_fully_vaccinated
            .max(row.people_fully_vaccinated);
        entry.vaccinated_per_hundred = max_rate(
            entry.vaccinated_per_hundred,
            row.people_vaccinated_per_hundred,
        );
        entry.fully_vaccinated_per_hundred = max_rate(
            entry.fully_vaccinated_per_hundred,
            row.people_fully_vaccinated_per_hundred,
        );
    }

    groups
        .into_iter()
        .map(|(location, peaks)| {
            let population = population.get(location).copied().flatten();
            CoverageRow {
                location: location.to_string(),
                population,
                people_vaccinated: peaks.people_vaccinated,
                people_fully_vaccinated: peaks.people_fully_vaccinated,
                people_vaccinated_per_hundred: peaks.vaccinated_per_hundred,
                people_fully_vaccinated_per_hundred: peaks.fully_vaccinated_per_hundred,
                pct_vaccinated: ratio_pct(peaks.people_vaccinated, population).map(round2),
                pct_fully_vaccinated: ratio_pct(peaks.people_fully_vaccinated, population)
                    .map(round2),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn case_row(continent: Option<&str>, location: &str, date: &str, population: Option<i64>) -> CaseRow {
        CaseRow {
            continent: continent.map(str::to_string),
            location: location.to_string(),
            date: day(date),
            population,
            total_cases: None,
            new_cases: None,
            total_deaths: None,
            new_deaths: None,
        }
    }

    fn vax_row(
        continent: Option<&str>,
        location: &str,
        date: &str,
        new_vaccinations: Option<i64>,
        people_vaccinated: Option<i64>,
    ) -> VaxRow {
        VaxRow {
            continent: continent.map(str::to_string),
            location: location.to_string(),
            date: day(date),
            new_tests: None,
            positive_rate: None,
            total_vaccinations: None,
            new_vaccinations,
            people_vaccinated,
            people_fully_vaccinated: None,
            people_vaccinated_per_hundred: None,
            people_fully_vaccinated_per_hundred: None,
        }
    }

    #[test]
    fn test_rollout_accumulates_per_location() {
        let ds = CovidDataset {
            cases: vec![
                case_row(Some("Europe"), "Albania", "2021-01-01", Some(1000)),
                case_row(Some("Europe"), "Albania", "2021-01-02", Some(1000)),
                case_row(Some("Europe"), "Albania", "2021-01-03", Some(1000)),
            ],
            vaccinations: vec![
                vax_row(Some("Europe"), "Albania", "2021-01-01", Some(60), None),
                vax_row(Some("Europe"), "Albania", "2021-01-02", None, None),
                vax_row(Some("Europe"), "Albania", "2021-01-03", Some(40), None),
            ],
        };

        let rows = vaccination_rollout(&ds);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].rolling_people_vaccinated, 60);
        assert_eq!(rows[1].rolling_people_vaccinated, 60);
        assert_eq!(rows[2].rolling_people_vaccinated, 100);
        assert_eq!(rows[2].pct_vaccinated, Some(10.0));
        assert_eq!(rows[2].continent, "Europe");
    }

    #[test]
    fn test_rollout_rows_keep_their_own_location_fields() {
        let ds = CovidDataset {
            cases: vec![
                case_row(Some("Europe"), "Albania", "2021-01-01", Some(1000)),
                case_row(Some("Africa"), "Zimbabwe", "2021-01-01", Some(500)),
            ],
            vaccinations: vec![
                vax_row(Some("Europe"), "Albania", "2021-01-01", Some(10), None),
                vax_row(Some("Africa"), "Zimbabwe", "2021-01-01", Some(50), None),
            ],
        };

        let rows = vaccination_rollout(&ds);

        assert_eq!(rows.len(), 2);
        let albania = rows.iter().find(|r| r.location == "Albania").unwrap();
        assert_eq!(albania.continent, "Europe");
        assert_eq!(albania.population, Some(1000));
        assert_eq!(albania.new_vaccinations, Some(10));
        let zimbabwe = rows.iter().find(|r| r.location == "Zimbabwe").unwrap();
        assert_eq!(zimbabwe.continent, "Africa");
        assert_eq!(zimbabwe.population, Some(500));
        assert_eq!(zimbabwe.new_vaccinations, Some(50));
    }

    #[test]
    fn test_rollout_can_exceed_one_hundred_percent() {
        let ds = CovidDataset {
            cases: vec![
                case_row(Some("Europe"), "Gibraltar", "2021-01-01", Some(100)),
                case_row(Some("Europe"), "Gibraltar", "2021-01-02", Some(100)),
            ],
            vaccinations: vec![
                vax_row(Some("Europe"), "Gibraltar", "2021-01-01", Some(90), None),
                vax_row(Some("Europe"), "Gibraltar", "2021-01-02", Some(30), None),
            ],
        };

        let rows = vaccination_rollout(&ds);

        assert_eq!(rows[1].rolling_people_vaccinated, 120);
        assert_eq!(rows[1].pct_vaccinated, Some(120.0));
    }

    #[test]
    fn test_rollout_skips_aggregate_rows() {
        let ds = CovidDataset {
            cases: vec![
                case_row(None, "World", "2021-01-01", Some(1_000_000)),
                case_row(Some("Europe"), "Albania", "2021-01-01", Some(1000)),
            ],
            vaccinations: vec![
                vax_row(None, "World", "2021-01-01", Some(500), None),
                vax_row(Some("Europe"), "Albania", "2021-01-01", Some(60), None),
            ],
        };

        let rows = vaccination_rollout(&ds);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location, "Albania");
    }

    #[test]
    fn test_coverage_takes_peak_headcounts() {
        let ds = CovidDataset {
            cases: vec![case_row(Some("Europe"), "Albania", "2021-01-01", Some(1000))],
            vaccinations: vec![
                vax_row(Some("Europe"), "Albania", "2021-01-01", None, Some(100)),
                vax_row(Some("Europe"), "Albania", "2021-01-02", None, Some(250)),
                vax_row(Some("Europe"), "Albania", "2021-01-03", None, None),
            ],
        };

        let rows = vaccination_coverage(&ds);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].people_vaccinated, Some(250));
        assert_eq!(rows[0].pct_vaccinated, Some(25.0));
        assert_eq!(rows[0].people_fully_vaccinated, None);
        assert_eq!(rows[0].pct_fully_vaccinated, None);
    }
}
