//! Partitioned rolling aggregation over daily, location-tagged observations.
//!
//! Every pass in this module stable-sorts its input by `(partition_key,
//! timestamp)` and then walks each partition independently: a trailing
//! window for a location never sees rows from another location, and a
//! running total restarts at each partition's first row.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// One row of a daily metric (new cases, new deaths, new vaccinations,
/// tests taken) for one location on one date.
///
/// `value` is `None` when the location did not report that day. Missing
/// values contribute nothing to window sums and count as zero in running
/// totals, which yields the same totals either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub partition_key: String,
    pub timestamp: NaiveDate,
    pub value: Option<i64>,
}

impl Observation {
    pub fn new(partition_key: impl Into<String>, timestamp: NaiveDate, value: Option<i64>) -> Self {
        Observation {
            partition_key: partition_key.into(),
            timestamp,
            value,
        }
    }
}

/// One aggregated output row per input [`Observation`].
///
/// `cumulative` is `None` for passes that do not compute a running total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub partition_key: String,
    pub timestamp: NaiveDate,
    pub windowed_sum: i64,
    pub windowed_avg: f64,
    pub cumulative: Option<i64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// The trailing window must cover at least one row.
    #[error("window size must be at least 1, got {0}")]
    InvalidWindow(usize),
}

/// Computes, for each partition in date order, the trailing
/// `window_size`-row sum and average of `value`.
///
/// The first `window_size - 1` rows of a partition use a partial window
/// (fewer rows have accumulated), yet the average still divides by the
/// full `window_size`. That understates early averages; it matches the
/// published reports this tool reproduces, so it is kept rather than
/// silently corrected.
///
/// Output rows come back in `(partition_key, timestamp)` order, one per
/// input observation, with `cumulative` left as `None`.
///
/// # Errors
///
/// Fails with [`AggregateError::InvalidWindow`] when `window_size` is 0.
pub fn rolling_window_sum(
    observations: &[Observation],
    window_size: usize,
) -> Result<Vec<AggregationResult>, AggregateError> {
    if window_size == 0 {
        return Err(AggregateError::InvalidWindow(window_size));
    }
    Ok(sorted_pass(observations, window_size, false))
}

/// Computes, for each partition in date order, the running total of
/// `value` from the partition's first row onward. Missing values count
/// as zero.
///
/// The windowed fields of each output row carry the row's own coerced
/// value, i.e. the degenerate trailing window of one row.
pub fn cumulative_sum(observations: &[Observation]) -> Vec<AggregationResult> {
    sorted_pass(observations, 1, true)
}

/// Single sweep that fills both the trailing-window fields and the
/// running total, for reports that chart a smoothed series next to its
/// cumulative curve.
///
/// # Errors
///
/// Fails with [`AggregateError::InvalidWindow`] when `window_size` is 0.
pub fn rolling_aggregate(
    observations: &[Observation],
    window_size: usize,
) -> Result<Vec<AggregationResult>, AggregateError> {
    if window_size == 0 {
        return Err(AggregateError::InvalidWindow(window_size));
    }
    Ok(sorted_pass(observations, window_size, true))
}

/// Shared pass body. Callers have already validated `window_size >= 1`.
fn sorted_pass(
    observations: &[Observation],
    window_size: usize,
    with_cumulative: bool,
) -> Vec<AggregationResult> {
    let mut ordered: Vec<&Observation> = observations.iter().collect();
    // sort_by is stable, so same-day duplicates keep their input order
    ordered.sort_by(|a, b| {
        a.partition_key
            .cmp(&b.partition_key)
            .then(a.timestamp.cmp(&b.timestamp))
    });

    let mut out = Vec::with_capacity(ordered.len());

    let mut current_partition: Option<&str> = None;
    let mut window: VecDeque<i64> = VecDeque::with_capacity(window_size);
    let mut window_sum: i64 = 0;
    let mut running_total: i64 = 0;

    for obs in ordered {
        if current_partition != Some(obs.partition_key.as_str()) {
            current_partition = Some(obs.partition_key.as_str());
            window.clear();
            window_sum = 0;
            running_total = 0;
        }

        let contribution = obs.value.unwrap_or(0);

        if window.len() == window_size {
            if let Some(leaving) = window.pop_front() {
                window_sum -= leaving;
            }
        }
        window.push_back(contribution);
        window_sum += contribution;
        running_total += contribution;

        out.push(AggregationResult {
            partition_key: obs.partition_key.clone(),
            timestamp: obs.timestamp,
            windowed_sum: window_sum,
            windowed_avg: window_sum as f64 / window_size as f64,
            cumulative: if with_cumulative {
                Some(running_total)
            } else {
                None
            },
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn obs(key: &str, date: &str, value: Option<i64>) -> Observation {
        Observation::new(key, day(date), value)
    }

    #[test]
    fn test_window_of_two_sums_self_plus_previous() {
        let input = vec![
            obs("US", "2021-01-01", Some(10)),
            obs("US", "2021-01-02", Some(20)),
            obs("US", "2021-01-03", Some(30)),
        ];

        let results = rolling_window_sum(&input, 2).unwrap();

        let sums: Vec<i64> = results.iter().map(|r| r.windowed_sum).collect();
        let avgs: Vec<f64> = results.iter().map(|r| r.windowed_avg).collect();
        assert_eq!(sums, vec![10, 30, 50]);
        assert_eq!(avgs, vec![5.0, 15.0, 25.0]);
        assert!(results.iter().all(|r| r.cumulative.is_none()));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let input = vec![obs("US", "2021-01-01", Some(1))];
        assert_eq!(
            rolling_window_sum(&input, 0),
            Err(AggregateError::InvalidWindow(0))
        );
        assert_eq!(
            rolling_aggregate(&input, 0),
            Err(AggregateError::InvalidWindow(0))
        );
    }

    #[test]
    fn test_partial_window_divides_by_full_size() {
        // Day two of a 7-day average divides by 7, not 2. The published
        // reports behave this way, so the early understatement is kept.
        let input = vec![
            obs("US", "2021-01-01", Some(7)),
            obs("US", "2021-01-02", Some(7)),
        ];

        let results = rolling_window_sum(&input, 7).unwrap();

        assert_eq!(results[0].windowed_sum, 7);
        assert_eq!(results[0].windowed_avg, 1.0);
        assert_eq!(results[1].windowed_sum, 14);
        assert_eq!(results[1].windowed_avg, 2.0);
    }

    #[test]
    fn test_first_row_of_each_partition_is_its_own_value() {
        let input = vec![
            obs("Albania", "2021-01-01", Some(3)),
            obs("Albania", "2021-01-02", Some(4)),
            obs("Zimbabwe", "2021-01-01", Some(9)),
        ];

        let results = rolling_window_sum(&input, 7).unwrap();

        assert_eq!(results[0].partition_key, "Albania");
        assert_eq!(results[0].windowed_sum, 3);
        assert_eq!(results[2].partition_key, "Zimbabwe");
        assert_eq!(results[2].windowed_sum, 9);
    }

    #[test]
    fn test_window_never_crosses_partition_boundary() {
        // Zimbabwe's first row must not see Albania's trailing values even
        // though they are adjacent after sorting.
        let input = vec![
            obs("Albania", "2021-01-01", Some(100)),
            obs("Albania", "2021-01-02", Some(100)),
            obs("Zimbabwe", "2021-01-01", Some(1)),
        ];

        let results = rolling_window_sum(&input, 3).unwrap();

        assert_eq!(results[2].windowed_sum, 1);
    }

    #[test]
    fn test_null_values_are_excluded_from_window_sums() {
        let input = vec![
            obs("US", "2021-01-01", Some(10)),
            obs("US", "2021-01-02", None),
            obs("US", "2021-01-03", Some(20)),
        ];

        let results = rolling_window_sum(&input, 3).unwrap();

        assert_eq!(results[2].windowed_sum, 30);
    }

    #[test]
    fn test_cumulative_counts_nulls_as_zero_and_restarts_per_partition() {
        let input = vec![
            obs("US", "2021-01-01", Some(10)),
            obs("US", "2021-01-02", None),
            obs("US", "2021-01-03", Some(20)),
            obs("Canada", "2021-01-01", Some(5)),
        ];

        let results = cumulative_sum(&input);

        // Canada sorts first
        assert_eq!(results[0].partition_key, "Canada");
        assert_eq!(results[0].cumulative, Some(5));
        assert_eq!(results[1].cumulative, Some(10));
        assert_eq!(results[2].cumulative, Some(10));
        assert_eq!(results[3].cumulative, Some(30));
    }

    #[test]
    fn test_cumulative_last_row_equals_sum_of_non_null_values() {
        let values = [Some(1), None, Some(2), Some(3), None, Some(4)];
        let input: Vec<Observation> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                obs(
                    "US",
                    &format!("2021-01-{:02}", i + 1),
                    *v,
                )
            })
            .collect();

        let results = cumulative_sum(&input);
        let expected: i64 = values.iter().flatten().sum();

        assert_eq!(results.last().unwrap().cumulative, Some(expected));
    }

    #[test]
    fn test_output_length_and_ordering_match_partition_date_sort() {
        // Input arrives interleaved and out of date order.
        let input = vec![
            obs("US", "2021-01-02", Some(2)),
            obs("Albania", "2021-01-01", Some(1)),
            obs("US", "2021-01-01", Some(1)),
            obs("Albania", "2021-01-02", Some(2)),
        ];

        let results = rolling_window_sum(&input, 2).unwrap();

        assert_eq!(results.len(), input.len());
        let order: Vec<(&str, NaiveDate)> = results
            .iter()
            .map(|r| (r.partition_key.as_str(), r.timestamp))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Albania", day("2021-01-01")),
                ("Albania", day("2021-01-02")),
                ("US", day("2021-01-01")),
                ("US", day("2021-01-02")),
            ]
        );
    }

    #[test]
    fn test_same_pass_twice_yields_identical_output() {
        let input = vec![
            obs("US", "2021-01-02", Some(2)),
            obs("US", "2021-01-01", Some(1)),
            obs("Albania", "2021-01-01", Some(4)),
        ];

        let first = rolling_aggregate(&input, 2).unwrap();
        let second = rolling_aggregate(&input, 2).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_changing_one_partition_leaves_the_other_untouched() {
        let base = vec![
            obs("Albania", "2021-01-01", Some(1)),
            obs("Albania", "2021-01-02", Some(2)),
            obs("US", "2021-01-01", Some(10)),
            obs("US", "2021-01-02", Some(20)),
        ];
        let mut altered = base.clone();
        altered[2].value = Some(999);
        altered[3].value = Some(999);

        let before = rolling_aggregate(&base, 2).unwrap();
        let after = rolling_aggregate(&altered, 2).unwrap();

        assert_eq!(before[0], after[0]);
        assert_eq!(before[1], after[1]);
        assert_ne!(before[2], after[2]);
    }

    #[test]
    fn test_combined_pass_fills_window_and_running_total() {
        let input = vec![
            obs("US", "2021-01-01", Some(10)),
            obs("US", "2021-01-02", Some(20)),
            obs("US", "2021-01-03", Some(30)),
        ];

        let results = rolling_aggregate(&input, 2).unwrap();

        assert_eq!(results[2].windowed_sum, 50);
        assert_eq!(results[2].cumulative, Some(60));
    }

    #[test]
    fn test_same_day_duplicates_keep_input_order() {
        // Not expected from the source data, but the sort must stay stable
        // when it happens.
        let input = vec![
            obs("US", "2021-01-01", Some(1)),
            obs("US", "2021-01-01", Some(2)),
        ];

        let results = cumulative_sum(&input);

        assert_eq!(results[0].windowed_sum, 1);
        assert_eq!(results[1].windowed_sum, 2);
        assert_eq!(results[1].cumulative, Some(3));
    }

    #[test]
    fn test_empty_input_produces_empty_output() {
        assert!(rolling_window_sum(&[], 7).unwrap().is_empty());
        assert!(cumulative_sum(&[]).is_empty());
    }
}
