//! Row types for the two dataset tables.
//!
//! Metric cells use permissive parsing: empty or unparseable values
//! deserialize to `None` and simply drop out of every sum. Key columns
//! (`location`, `date`) stay strict because they drive partitioning and
//! the table join.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// One row of the case/death table: daily counts for one location.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseRow {
    #[serde(default)]
    pub continent: Option<String>,
    pub location: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_count")]
    pub population: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_cases: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub new_cases: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_deaths: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub new_deaths: Option<i64>,
}

/// One row of the testing/vaccination table for one location and date.
#[derive(Debug, Clone, Deserialize)]
pub struct VaxRow {
    #[serde(default)]
    pub continent: Option<String>,
    pub location: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_count")]
    pub new_tests: Option<i64>,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub positive_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_vaccinations: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub new_vaccinations: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub people_vaccinated: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub people_fully_vaccinated: Option<i64>,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub people_vaccinated_per_hundred: Option<f64>,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub people_fully_vaccinated_per_hundred: Option<f64>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_count))
}

fn lenient_rate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_rate))
}

/// Parses an integer count, accepting float-formatted cells ("1234.0")
/// by truncation the way a SQL integer cast does. Anything else is a
/// missing value, not an error.
pub(crate) fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f as i64)
}

pub(crate) fn parse_rate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}
