//! Top-N rankings: peak infection share, peak death counts, and the
//! per-continent death summary.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::dataset::CovidDataset;
use crate::filters;

use super::types::{ContinentDeathsRow, DeathRankingRow, InfectionRankingRow};
use super::utility::{ratio_pct, round2};

/// Locations ranked by the share of their population ever infected,
/// highest first, capped at `limit`.
///
/// Uses the location-differs-from-continent view, so "World"-style
/// aggregates rank alongside countries and only self-labelled continent
/// rows drop out.
pub fn infection_ranking(dataset: &CovidDataset, limit: usize) -> Vec<InfectionRankingRow> {
    let mut groups: BTreeMap<&str, (Option<i64>, Option<i64>)> = BTreeMap::new();

    for row in &dataset.cases {
        if !filters::distinct_from_continent(&row.location, row.continent.as_deref()) {
            continue;
        }
        let entry = groups.entry(row.location.as_str()).or_default();
        entry.0 = entry.0.max(row.population);
        entry.1 = entry.1.max(row.total_cases);
    }

    let mut out: Vec<InfectionRankingRow> = groups
        .into_iter()
        .map(|(location, (population, peak_cases))| InfectionRankingRow {
            location: location.to_string(),
            population,
            peak_cases,
            peak_infected_pct: ratio_pct(peak_cases, population).map(round2),
        })
        .collect();

    sort_descending(&mut out, |r| r.peak_infected_pct, |r| &r.location);
    out.truncate(limit);
    out
}

/// Locations ranked by their highest reported cumulative death count,
/// capped at `limit`. Country rows only (`has_continent`).
pub fn death_ranking(dataset: &CovidDataset, limit: usize) -> Vec<DeathRankingRow> {
    let mut groups: BTreeMap<&str, Option<i64>> = BTreeMap::new();

    for row in &dataset.cases {
        if !filters::has_continent(row.continent.as_deref()) {
            continue;
        }
        let entry = groups.entry(row.location.as_str()).or_default();
        *entry = (*entry).max(row.total_deaths);
    }

    let mut out: Vec<DeathRankingRow> = groups
        .into_iter()
        .map(|(location, peak_deaths)| DeathRankingRow {
            location: location.to_string(),
            peak_deaths,
        })
        .collect();

    sort_descending(&mut out, |r| r.peak_deaths.map(|d| d as f64), |r| &r.location);
    out.truncate(limit);
    out
}

/// Highest cumulative death count among each continent's country rows,
/// highest first. Small list, no cap.
pub fn continent_deaths(dataset: &CovidDataset) -> Vec<ContinentDeathsRow> {
    let mut groups: BTreeMap<&str, Option<i64>> = BTreeMap::new();

    for row in &dataset.cases {
        let Some(continent) = row.continent.as_deref() else {
            continue;
        };
        if !filters::has_continent(Some(continent)) {
            continue;
        }
        let entry = groups.entry(continent).or_default();
        *entry = (*entry).max(row.total_deaths);
    }

    let mut out: Vec<ContinentDeathsRow> = groups
        .into_iter()
        .map(|(continent, peak_deaths)| ContinentDeathsRow {
            continent: continent.to_string(),
            peak_deaths,
        })
        .collect();

    sort_descending(&mut out, |r| r.peak_deaths.map(|d| d as f64), |r| &r.continent);
    out
}

/// Sorts by the key descending with missing values last; ties break on
/// the label so output order is deterministic.
fn sort_descending<T>(
    rows: &mut [T],
    key: impl Fn(&T) -> Option<f64>,
    label: impl Fn(&T) -> &str,
) {
    rows.sort_by(|a, b| match (key(a), key(b)) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| label(a).cmp(label(b))),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => label(a).cmp(label(b)),
    });
}
