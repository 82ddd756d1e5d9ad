//! Worldwide totals built by summing country rows, per day and overall.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::dataset::CovidDataset;
use crate::filters;

use super::types::{GlobalDailyRow, GlobalTotalsRow};
use super::utility::{ratio_pct, round2};

/// Per-date worldwide sums of new cases and deaths across country rows
/// (`has_continent`), in date order. Summing country rows rather than
/// taking the published "World" row keeps the two global reports
/// consistent with each other.
pub fn global_daily(dataset: &CovidDataset) -> Vec<GlobalDailyRow> {
    let mut by_date: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();

    for row in &dataset.cases {
        if !filters::has_continent(row.continent.as_deref()) {
            continue;
        }
        let entry = by_date.entry(row.date).or_default();
        entry.0 += row.new_cases.unwrap_or(0);
        entry.1 += row.new_deaths.unwrap_or(0);
    }

    by_date
        .into_iter()
        .map(|(date, (new_cases, new_deaths))| GlobalDailyRow {
            date,
            new_cases,
            new_deaths,
            death_pct: ratio_pct(Some(new_deaths), Some(new_cases)).map(round2),
        })
        .collect()
}

/// Single worldwide summary row across all country rows.
pub fn global_totals(dataset: &CovidDataset) -> GlobalTotalsRow {
    let mut total_cases = 0i64;
    let mut total_deaths = 0i64;

    for row in &dataset.cases {
        if !filters::has_continent(row.continent.as_deref()) {
            continue;
        }
        total_cases += row.new_cases.unwrap_or(0);
        total_deaths += row.new_deaths.unwrap_or(0);
    }

    GlobalTotalsRow {
        total_cases,
        total_deaths,
        death_pct: ratio_pct(Some(total_deaths), Some(total_cases)).map(round2),
    }
}
