//! Test positivity: share of administered tests coming back positive
//! over a trailing window, next to the published daily rate.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::dataset::{CovidDataset, VaxRow};
use crate::filters;
use crate::rolling::{self, AggregateError, Observation};

use super::types::PositivityRow;
use super::utility::{location_matches, ratio_pct, round2};

/// Windowed positivity per location and day: trailing sums of new cases
/// and new tests over `window` days, their ratio as a percentage, and
/// the dataset's own `positive_rate` (scaled to percent) alongside for
/// comparison. Country rows only (`has_continent`); `location` narrows
/// to matching locations.
///
/// Days whose trailing test window is empty or zero get an empty
/// positivity cell rather than a division error.
///
/// # Errors
///
/// Fails with [`AggregateError::InvalidWindow`] when `window` is 0.
pub fn positivity(
    dataset: &CovidDataset,
    window: usize,
    location: Option<&str>,
) -> Result<Vec<PositivityRow>, AggregateError> {
    let joined: Vec<_> = dataset
        .joined()
        .into_iter()
        .filter(|(c, _)| filters::has_continent(c.continent.as_deref()))
        .filter(|(c, _)| location_matches(&c.location, location))
        .collect();

    let case_obs: Vec<Observation> = joined
        .iter()
        .map(|(c, _)| Observation::new(c.location.clone(), c.date, c.new_cases))
        .collect();
    let test_obs: Vec<Observation> = joined
        .iter()
        .map(|(c, v)| Observation::new(c.location.clone(), c.date, v.new_tests))
        .collect();

    let case_windows = rolling::rolling_window_sum(&case_obs, window)?;
    let test_windows = rolling::rolling_window_sum(&test_obs, window)?;

    let index: HashMap<(&str, NaiveDate), &VaxRow> = joined
        .iter()
        .map(|(c, v)| ((c.location.as_str(), c.date), *v))
        .collect();

    // Both passes sort the same key set, so the rows pair up one-to-one.
    Ok(case_windows
        .into_iter()
        .zip(test_windows)
        .map(|(cases, tests)| {
            debug_assert_eq!(cases.partition_key, tests.partition_key);
            debug_assert_eq!(cases.timestamp, tests.timestamp);

            let vax = index
                .get(&(cases.partition_key.as_str(), cases.timestamp))
                .copied();
            PositivityRow {
                location: cases.partition_key,
                date: cases.timestamp,
                new_tests: vax.and_then(|v| v.new_tests),
                window_tests: tests.windowed_sum,
                window_cases: cases.windowed_sum,
                positivity_pct: ratio_pct(Some(cases.windowed_sum), Some(tests.windowed_sum))
                    .map(round2),
                reported_positive_pct: vax
                    .and_then(|v| v.positive_rate)
                    .map(|r| round2(r * 100.0)),
            }
        })
        .collect())
}
